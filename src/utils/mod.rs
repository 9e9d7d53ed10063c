mod build_resp;
mod check_pass;
mod sendmail;

pub use build_resp::{build_err_resp, build_resp};
pub use check_pass::{check_pass, hash_pass};
pub use sendmail::sendmail;
