mod facebook;

pub use facebook::{get_facebook, get_facebook_callback};

pub use facebook::__path_get_facebook;
pub use facebook::__path_get_facebook_callback;
