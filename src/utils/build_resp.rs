use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::routes::{ApiResponse, ErrorResponseBody};

pub fn build_resp<T: Serialize>(
    status: StatusCode,
    description: impl ToString,
    body: T,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            description: description.to_string(),
            body: Some(body),
        }),
    )
}

pub fn build_err_resp(
    status: StatusCode,
    message: impl ToString,
) -> (StatusCode, Json<ApiResponse<ErrorResponseBody>>) {
    let description = match status {
        StatusCode::BAD_REQUEST => "Server has received a bad request.",
        StatusCode::UNAUTHORIZED => "Unauthorized.",
        StatusCode::NOT_FOUND => "Requested resource is not found.",
        StatusCode::CONFLICT => "A conflict has occurred on the server.",
        _ => "An internal server error has occurred.",
    };
    (
        status,
        Json(ApiResponse {
            description: String::from(description),
            body: Some(ErrorResponseBody {
                message: message.to_string(),
            }),
        }),
    )
}
