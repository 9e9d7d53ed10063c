use crate::{
    models::{auth::TokenPurpose, users},
    routes::{ApiResponse, ErrorResponseBody},
    utils::{build_err_resp, check_pass, sendmail},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::ActiveModelTrait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteRequestBody {
    pub token: String,
    pub password: String,
}

/// Send a request to delete the user.
///
/// The user will receive an email with a token to confirm the deletion.
#[utoipa::path(get, path = "/api/user/delete", responses(
    (status = 200, description = "Token sent to user's email."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn get_delete(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<users::Model>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
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
            TokenPurpose::DeleteAccount,
            data.tokens.default_ttl(),
        )
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate token: {:?}", e),
            )
        })?;

    let body = format!(
        "Hello, {}!\n\n\
        You have requested to delete your account. Please copy the following token into the app to continue:\n\n\
        {}\n\n\
        If you did not request to delete your account, please ignore this email.\n\n\
        Best regards,\n\
        The {} team",
        &user.username, token, &data.env.app_name,
    );

    match sendmail(
        &data.env,
        &user.username,
        &user.email,
        &format!("{} - Delete your account", &data.env.app_name),
        &body,
    ) {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => Err(build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to send email. SMTP error: {}", e),
        )),
    }
}

/// Confirm the deletion with the emailed token and the account password.
///
/// The token is single-use.
#[utoipa::path(post, path = "/api/user/delete", responses(
    (status = 200, description = "User deleted."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn post_delete(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<users::Model>,
    Json(query): Json<DeleteRequestBody>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    if query.password.is_empty() {
        return Err(build_err_resp(
            StatusCode::BAD_REQUEST,
            "Password cannot be empty.",
        ));
    }

    let action = data
        .tokens
        .verify(&query.token, &user.id, TokenPurpose::DeleteAccount)
        .map_err(|e| {
            tracing::warn!("account deletion token rejected: {:?}", e);
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "The deletion link is invalid or has expired.",
            )
        })?;

    if !check_pass(&user.password, &query.password) {
        return Err(build_err_resp(
            StatusCode::BAD_REQUEST,
            "Invalid username or password.",
        ));
    }

    // consume only once the password also checks out, so a typo does not
    // burn the emailed token
    data.consumed
        .consume(&action.jti, action.expires_at)
        .map_err(|e| {
            tracing::warn!("account deletion token rejected: {:?}", e);
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "The deletion link is invalid or has expired.",
            )
        })?;

    let user: users::ActiveModel = user.into();

    user.delete(&data.db).await.map_err(|e| {
        build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to delete user. Database error: {}", e),
        )
    })?;

    Ok(StatusCode::OK)
}
