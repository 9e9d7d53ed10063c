use serde::{Deserialize, Serialize};

/// Claims carried by the session cookie.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// The one operation an emailed action token is allowed to authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TokenPurpose {
    ConfirmAccount,
    ResetPassword,
    DeleteAccount,
}

/// Claims carried by emailed action tokens.
#[derive(Debug, Deserialize, Serialize)]
pub struct ActionTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub purpose: TokenPurpose,
}
