use crate::{
    models::{auth::TokenPurpose, prelude::Users, users},
    routes::{ApiResponse, ErrorResponseBody},
    utils::{build_err_resp, hash_pass},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResetRequest {
    pub email: String,
    pub token: String,
    pub password: String,
}

/// Set a new password using the token received by email.
///
/// The token is single-use: a second reset needs a fresh one.
#[utoipa::path(post, path = "/api/auth/reset", responses(
    (status = 200, description = "Password reset successful."),
    (status = 500, description = "Internal server error.", body = ErrorResponse),
    (status = 400, description = "Bad request.", body = ErrorResponse),
))]
pub async fn post_reset(
    State(data): State<Arc<AppState>>,
    query: Json<ResetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ErrorResponseBody>>)> {
    if query.password.is_empty() {
        return Err(build_err_resp(
            StatusCode::BAD_REQUEST,
            "Password cannot be empty.",
        ));
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
        })?
        .ok_or_else(|| {
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "The reset link is invalid or has expired.",
            )
        })?;

    let action = data
        .tokens
        .verify(&query.token, &user.id, TokenPurpose::ResetPassword)
        .map_err(|e| {
            tracing::warn!("password reset token rejected: {:?}", e);
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "The reset link is invalid or has expired.",
            )
        })?;

    data.consumed
        .consume(&action.jti, action.expires_at)
        .map_err(|e| {
            tracing::warn!("password reset token rejected: {:?}", e);
            build_err_resp(
                StatusCode::BAD_REQUEST,
                "The reset link is invalid or has expired.",
            )
        })?;

    let hashed_password = hash_pass(&query.password)
        .map_err(|e| build_err_resp(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    let mut user: users::ActiveModel = user.into();
    user.password = Set(hashed_password);
    user.updated_at = Set(chrono::Utc::now().to_string());
    user.save(&data.db).await.map_err(|e| {
        build_err_resp(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update user. Database error: {}", e),
        )
    })?;

    Ok(StatusCode::OK)
}
