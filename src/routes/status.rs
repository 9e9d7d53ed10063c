use crate::utils::build_resp;
use axum::{http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusResponseBody {
    pub server_time: DateTime<Local>,
    pub version: String,
}

#[utoipa::path(get, path = "/api/status", responses(
    (status = 200, description = "Status check successful.", body = StatusResponse),
))]
pub async fn get_status() -> impl IntoResponse {
    build_resp(
        StatusCode::OK,
        "Status check successful.",
        StatusResponseBody {
            server_time: Local::now(),
            version: String::from(env!("CARGO_PKG_VERSION")),
        },
    )
}
