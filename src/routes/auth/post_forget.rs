use crate::{
    models::{auth::TokenPurpose, prelude::Users, users},
    routes::{ApiResponse, ErrorResponseBody},
    utils::{build_err_resp, sendmail},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ForgetRequest {
    pub email: String,
}

/// Request a password-reset token by email.
///
/// Responds 200 whether or not the address belongs to an account.
#[utoipa::path(post, path = "/api/auth/forget", responses(
    (status = 200, description = "Reset token sent if the account exists."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn post_forget(
    State(data): State<Arc<AppState>>,
    query: Json<ForgetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    if data.env.smtp_host.is_none() {
        return Err(build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SMTP is not configured, please contact the server administrator.",
        ));
    }

    if !email_address::EmailAddress::is_valid(&query.email) {
        return Err(build_err_resp(StatusCode::BAD_REQUEST, "Invalid email."));
    }

    let user = Users::find()
        .filter(users::Column::Email.eq(query.email.to_ascii_lowercase()))
        .one(&data.db)
        .await
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch user from database. Database error: {}", e),
            )
        })?;

    // do not reveal whether the address is registered
    let Some(user) = user else {
        return Ok(StatusCode::OK);
    };

    let token = data
        .tokens
        .issue(&user.id, TokenPurpose::ResetPassword, data.tokens.default_ttl())
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate token: {:?}", e),
            )
        })?;

    let body = format!(
        "Hello, {}!\n\n\
        You have requested to reset your password. Please copy the following token into the app to reset your password:\n\n\
        {}\n\n\
        If you did not request to reset your password, please ignore this email.\n\n\
        Best regards,\n\
        The {} team",
        &user.username, token, &data.env.app_name,
    );

    match sendmail(
        &data.env,
        &user.username,
        &user.email,
        &format!("{} - Reset your password", &data.env.app_name),
        &body,
    ) {
        Ok(_) => Ok(StatusCode::OK),
        Err(e) => Err(build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to send email. SMTP error: {}", e),
        )),
    }
}
