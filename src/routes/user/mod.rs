mod delete;
mod get_check;
mod verify;

pub use delete::{get_delete, post_delete, DeleteRequestBody};
pub use get_check::get_check;
pub use verify::{get_verify, post_verify, VerifyRequest};

pub use delete::__path_get_delete;
pub use delete::__path_post_delete;
pub use get_check::__path_get_check;
pub use verify::__path_get_verify;
pub use verify::__path_post_verify;
