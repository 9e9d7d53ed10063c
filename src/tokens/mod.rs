//! Signed, expiring, purpose-bound action tokens.
//!
//! A token authorizes exactly one operation (confirm account, reset
//! password, delete account) for exactly one user, for a bounded time.
//! Issuance is stateless; the reset and delete flows additionally mark the
//! token id as consumed through [`ConsumedTokens`].

mod consumed;

pub use consumed::ConsumedTokens;

use crate::{
    config::Config,
    models::auth::{ActionTokenClaims, TokenPurpose},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    InvalidInput,
    Malformed,
    TamperedToken,
    Expired,
    PurposeMismatch,
    SubjectMismatch,
    Consumed,
}

/// The decoded, fully validated content of an action token.
#[derive(Debug)]
pub struct VerifiedAction {
    pub subject_id: String,
    pub purpose: TokenPurpose,
    pub jti: String,
    pub expires_at: i64,
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(env: &Config) -> Self {
        Self::with_secret(
            env.jwt_secret.as_bytes(),
            Duration::seconds(env.confirm_ttl_sec),
        )
    }

    pub fn with_secret(secret: &[u8], default_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issues a token authorizing `purpose` for `subject_id` until
    /// `now + ttl`. Stateless: nothing is stored server-side.
    pub fn issue(
        &self,
        subject_id: &str,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, VerificationError> {
        self.issue_at(Utc::now(), subject_id, purpose, ttl)
    }

    fn issue_at(
        &self,
        now: DateTime<Utc>,
        subject_id: &str,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, VerificationError> {
        if subject_id.is_empty() || ttl <= Duration::zero() {
            return Err(VerificationError::InvalidInput);
        }

        let claims = ActionTokenClaims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            purpose,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|_| VerificationError::InvalidInput)
    }

    /// Checks signature, expiry, purpose and subject, in that order. Any
    /// failed clause rejects the whole token; nothing is written anywhere.
    pub fn verify(
        &self,
        token: &str,
        expected_subject: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerifiedAction, VerificationError> {
        self.verify_at(Utc::now(), token, expected_subject, expected_purpose)
    }

    fn verify_at(
        &self,
        now: DateTime<Utc>,
        token: &str,
        expected_subject: &str,
        expected_purpose: TokenPurpose,
    ) -> Result<VerifiedAction, VerificationError> {
        let mut validation = Validation::default();
        // expiry is checked below against the caller's clock, without leeway
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<ActionTokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    VerificationError::TamperedToken
                }
                _ => VerificationError::Malformed,
            })?
            .claims;

        if now.timestamp() > claims.exp {
            return Err(VerificationError::Expired);
        }
        if claims.purpose != expected_purpose {
            return Err(VerificationError::PurposeMismatch);
        }
        if claims.sub != expected_subject {
            return Err(VerificationError::SubjectMismatch);
        }

        Ok(VerifiedAction {
            subject_id: claims.sub,
            purpose: claims.purpose,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::with_secret(b"unit-test-secret", Duration::seconds(3600))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn issued_token_verifies_for_every_purpose() {
        let svc = service();
        for purpose in [
            TokenPurpose::ConfirmAccount,
            TokenPurpose::ResetPassword,
            TokenPurpose::DeleteAccount,
        ] {
            let token = svc.issue("user-1", purpose, Duration::seconds(60)).unwrap();
            let action = svc.verify(&token, "user-1", purpose).unwrap();
            assert_eq!(action.subject_id, "user-1");
            assert_eq!(action.purpose, purpose);
            assert!(!action.jti.is_empty());
        }
    }

    #[test]
    fn issue_rejects_empty_subject() {
        let svc = service();
        let err = svc
            .issue("", TokenPurpose::ConfirmAccount, Duration::seconds(60))
            .unwrap_err();
        assert_eq!(err, VerificationError::InvalidInput);
    }

    #[test]
    fn issue_rejects_non_positive_ttl() {
        let svc = service();
        for ttl in [Duration::zero(), Duration::seconds(-1)] {
            let err = svc
                .issue("user-1", TokenPurpose::ResetPassword, ttl)
                .unwrap_err();
            assert_eq!(err, VerificationError::InvalidInput);
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service();
        for token in ["", "not-a-token", "a.b", "a.b.c.d"] {
            let err = svc
                .verify(token, "user-1", TokenPurpose::ConfirmAccount)
                .unwrap_err();
            assert_eq!(err, VerificationError::Malformed);
        }
    }

    #[test]
    fn mutated_byte_is_rejected() {
        let svc = service();
        let token = svc
            .issue("user-1", TokenPurpose::ConfirmAccount, Duration::seconds(60))
            .unwrap();

        // flip one character in the payload segment
        let payload_start = token.find('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[payload_start] = if bytes[payload_start] == b'A' { b'B' } else { b'A' };
        let mutated = String::from_utf8(bytes).unwrap();

        let err = svc
            .verify(&mutated, "user-1", TokenPurpose::ConfirmAccount)
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationError::TamperedToken | VerificationError::Malformed
        ));
    }

    #[test]
    fn spliced_payload_is_tampered() {
        let svc = service();
        let now = at(0);
        let ttl = Duration::seconds(60);
        let real = svc
            .issue_at(now, "42", TokenPurpose::ConfirmAccount, ttl)
            .unwrap();
        let other = svc
            .issue_at(now, "43", TokenPurpose::ConfirmAccount, ttl)
            .unwrap();

        // well-formed payload from one token, signature from another
        let real_parts: Vec<&str> = real.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", real_parts[0], other_parts[1], real_parts[2]);

        let err = svc
            .verify_at(at(1), &forged, "43", TokenPurpose::ConfirmAccount)
            .unwrap_err();
        assert_eq!(err, VerificationError::TamperedToken);
    }

    #[test]
    fn expiry_boundary() {
        let svc = service();
        let token = svc
            .issue_at(at(0), "user-1", TokenPurpose::ResetPassword, Duration::seconds(3600))
            .unwrap();

        assert!(svc
            .verify_at(at(3599), &token, "user-1", TokenPurpose::ResetPassword)
            .is_ok());
        assert!(svc
            .verify_at(at(3600), &token, "user-1", TokenPurpose::ResetPassword)
            .is_ok());
        let err = svc
            .verify_at(at(3601), &token, "user-1", TokenPurpose::ResetPassword)
            .unwrap_err();
        assert_eq!(err, VerificationError::Expired);
    }

    #[test]
    fn purpose_mismatch_rejected_on_otherwise_valid_token() {
        let svc = service();
        let token = svc
            .issue("user-1", TokenPurpose::ConfirmAccount, Duration::seconds(60))
            .unwrap();
        let err = svc
            .verify(&token, "user-1", TokenPurpose::ResetPassword)
            .unwrap_err();
        assert_eq!(err, VerificationError::PurposeMismatch);
    }

    #[test]
    fn subject_mismatch_rejected_on_otherwise_valid_token() {
        let svc = service();
        let token = svc
            .issue("user-1", TokenPurpose::ConfirmAccount, Duration::seconds(60))
            .unwrap();
        let err = svc
            .verify(&token, "user-2", TokenPurpose::ConfirmAccount)
            .unwrap_err();
        assert_eq!(err, VerificationError::SubjectMismatch);
    }

    #[test]
    fn reset_tokens_are_single_use() {
        let svc = service();
        let consumed = ConsumedTokens::default();
        let token = svc
            .issue("user-1", TokenPurpose::ResetPassword, Duration::seconds(60))
            .unwrap();

        let action = svc
            .verify(&token, "user-1", TokenPurpose::ResetPassword)
            .unwrap();
        assert!(consumed.consume(&action.jti, action.expires_at).is_ok());

        // the token itself still verifies; the consumed set is what turns
        // the second use into a replay
        let again = svc
            .verify(&token, "user-1", TokenPurpose::ResetPassword)
            .unwrap();
        assert_eq!(
            consumed.consume(&again.jti, again.expires_at),
            Err(VerificationError::Consumed)
        );
    }

    #[test]
    fn confirm_token_lifecycle_for_user_42() {
        let svc = service();
        let token = svc
            .issue_at(at(0), "42", TokenPurpose::ConfirmAccount, Duration::seconds(3600))
            .unwrap();

        let action = svc
            .verify_at(at(3599), &token, "42", TokenPurpose::ConfirmAccount)
            .unwrap();
        assert_eq!(action.subject_id, "42");

        assert_eq!(
            svc.verify_at(at(3601), &token, "42", TokenPurpose::ConfirmAccount)
                .unwrap_err(),
            VerificationError::Expired
        );
        assert_eq!(
            svc.verify_at(at(100), &token, "7", TokenPurpose::ConfirmAccount)
                .unwrap_err(),
            VerificationError::SubjectMismatch
        );
    }
}
