use crate::{
    models::{auth::TokenPurpose, prelude::Users, users},
    routes::{ApiResponse, ErrorResponseBody},
    utils::{build_err_resp, hash_pass, sendmail},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register a new, unconfirmed user and send the confirmation email.
#[utoipa::path(post, path = "/api/auth/register", responses(
    (status = 200, description = "Registration successful."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 409, description = "A conflict has occurred.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn post_register(
    State(data): State<Arc<AppState>>,
    query: Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    if query.username.is_empty() || query.password.is_empty() {
        return Err(build_err_resp(
            StatusCode::BAD_REQUEST,
            "Username and password cannot be empty.",
        ));
    }

    if !email_address::EmailAddress::is_valid(&query.email) {
        return Err(build_err_resp(StatusCode::BAD_REQUEST, "Invalid email."));
    }

    let email = query.email.to_ascii_lowercase();

    let email_exists = Users::find()
        .filter(users::Column::Email.eq(&email))
        .one(&data.db)
        .await
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch user from database. Database error: {}", e),
            )
        })?;

    if email_exists.is_some() {
        return Err(build_err_resp(
            StatusCode::CONFLICT,
            "An user with this email already exists.",
        ));
    }

    let hashed_password = hash_pass(&query.password)
        .map_err(|e| build_err_resp(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let id = uuid::Uuid::new_v4().to_string();
    let created_at = chrono::Utc::now().to_string();

    let user = users::ActiveModel {
        id: Set(id.clone()),
        username: Set(query.username.clone()),
        email: Set(email.clone()),
        password: Set(hashed_password),
        is_confirmed: Set(false),
        created_at: Set(created_at.clone()),
        updated_at: Set(created_at),
    };

    user.insert(&data.db).await.map_err(|e| {
        build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to insert user into database. Database error: {}", e),
        )
    })?;

    if data.env.smtp_host.is_none() {
        tracing::warn!("smtp is not configured, skipping confirmation email");
        return Ok(StatusCode::OK);
    }

    let token = data
        .tokens
        .issue(&id, TokenPurpose::ConfirmAccount, data.tokens.default_ttl())
        .map_err(|e| {
            build_err_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate token: {:?}", e),
            )
        })?;

    let body = format!(
        "Hello, {}!\n\n\
        Thank you for signing up. Please copy the following token into the app to confirm your account:\n\n\
        {}\n\n\
        If you did not sign up, please ignore this email.\n\n\
        Best regards,\n\
        The {} team",
        &query.username, token, &data.env.app_name,
    );

    match sendmail(
        &data.env,
        &query.username,
        &email,
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
