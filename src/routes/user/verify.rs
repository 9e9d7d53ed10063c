use crate::{
    models::{auth::TokenPurpose, users},
    routes::{ApiResponse, ErrorResponseBody},
    utils::{build_err_resp, sendmail},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct VerifyRequest {
    pub token: String,
}

/// Resend the confirmation email for the logged-in user.
#[utoipa::path(get, path = "/api/user/verify", responses(
    (status = 200, description = "Confirmation email sent."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn get_verify(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<users::Model>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    if user.is_confirmed {
        return Err(build_err_resp(
            StatusCode::BAD_REQUEST,
            "User is already confirmed.",
        ));
    }

    if data.env.smtp_host.is_none() {
        return Err(build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SMTP is not configured, please contact the server administrator.",
        ));
    }

    let token = data
        .tokens
        .issue(
            &user.id,
            TokenPurpose::ConfirmAccount,
            data.tokens.default_ttl(),
        )
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate token: {:?}", e),
            )
        })?;

    let body = format!(
        "Hello {},\n\n\
        You have requested to confirm your account. \
        Please copy the following token into the app to continue:\n\n\
        {}\n\n\
        If you did not request this, please ignore this email.\n\n\
        Thanks,\n\
        The {} Team",
        &user.username, token, &data.env.app_name,
    );

    match sendmail(
        &data.env,
        &user.username,
        &user.email,
        &format!("{} - Confirm your account", &data.env.app_name),
        &body,
    ) {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => Err(build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to send email. SMTP error: {}", e),
        )),
    }
}

/// Confirm the logged-in user's account with the token sent to their email.
#[utoipa::path(post, path = "/api/user/verify", responses(
    (status = 200, description = "Account confirmed."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn post_verify(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<users::Model>,
    Json(query): Json<VerifyRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    if user.is_confirmed {
        return Err(build_err_resp(
            StatusCode::BAD_REQUEST,
            "User is already confirmed.",
        ));
    }

    data.tokens
        .verify(&query.token, &user.id, TokenPurpose::ConfirmAccount)
        .map_err(|e| {
            tracing::warn!("confirmation token rejected: {:?}", e);
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "The confirmation link is invalid or has expired.",
            )
        })?;

    let mut user: users::ActiveModel = user.into();
    user.is_confirmed = Set(true);
    user.updated_at = Set(chrono::Utc::now().to_string());

    user.save(&data.db).await.map_err(|e| {
        build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update user. Database error: {}", e),
        )
    })?;

    Ok(StatusCode::OK)
}
