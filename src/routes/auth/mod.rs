mod get_logout;
mod post_forget;
mod post_login;
mod post_register;
mod post_reset;

pub use get_logout::get_logout;
pub use post_forget::{post_forget, ForgetRequest};
pub use post_login::{post_login, LoginRequest, LoginResponseBody};
pub use post_register::{post_register, RegisterRequest};
pub use post_reset::{post_reset, ResetRequest};

pub use get_logout::__path_get_logout;
pub use post_forget::__path_post_forget;
pub use post_login::__path_post_login;
pub use post_register::__path_post_register;
pub use post_reset::__path_post_reset;
