pub mod auth;
pub mod middlewares;
pub mod oauth;
pub mod status;
pub mod user;

pub use self::{
    auth::{ForgetRequest, LoginRequest, LoginResponseBody, RegisterRequest, ResetRequest},
    status::StatusResponseBody,
    user::{DeleteRequestBody, VerifyRequest},
};

use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Clone, Deserialize, Serialize, ToSchema, Debug)]
pub struct ErrorResponseBody {
    /// The error message.
    pub message: String,
}

#[derive(Clone, Deserialize, Serialize, ToSchema, Debug)]
#[aliases(
    ErrorResponse = ApiResponse<ErrorResponseBody>,
    LoginResponse = ApiResponse<LoginResponseBody>,
    StatusResponse = ApiResponse<StatusResponseBody>,
)]
pub struct ApiResponse<T> {
    /// A description of the response status.
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(flatten)]
    pub body: Option<T>,
}

#[derive(OpenApi)]
#[openapi(
    info(
        description = "aikotoba's account API documentation.",
        license(name = "MIT or Apache-2.0"),
    ),
    tags(
        (
            name = "auth",
            description = "Register, login, logout, forgotten-password flow."
        ),
        (
            name = "user",
            description = "Account confirmation, deletion, session checks."
        ),
        (
            name = "oauth",
            description = "Federated login."
        ),
        (
            name = "status",
            description = "Server status."
        )
    ),
    paths(
        auth::post_register,
        auth::post_login,
        auth::get_logout,
        auth::post_forget,
        auth::post_reset,
        user::get_check,
        user::get_verify,
        user::post_verify,
        user::get_delete,
        user::post_delete,
        oauth::get_facebook,
        oauth::get_facebook_callback,
        status::get_status,
    ),
    components(schemas(
        DeleteRequestBody,
        ErrorResponse,
        ErrorResponseBody,
        ForgetRequest,
        LoginRequest,
        LoginResponse,
        LoginResponseBody,
        RegisterRequest,
        ResetRequest,
        StatusResponse,
        StatusResponseBody,
        VerifyRequest,
    ))
)]
pub struct ApiDoc;
