use super::VerificationError;
use chrono::Utc;
use std::{collections::HashMap, sync::Mutex};

/// Consumed token ids, for flows that must be single-use.
///
/// Stateless tokens stay valid until expiry, so reset and delete record the
/// token id here on first use. An entry only has to outlive its token:
/// ids whose expiry has passed are dropped on the next insert.
#[derive(Debug, Default)]
pub struct ConsumedTokens {
    inner: Mutex<HashMap<String, i64>>,
}

impl ConsumedTokens {
    /// Marks the token id as consumed. Rejects with `Consumed` when the id
    /// has already been used, i.e. the token is being replayed.
    pub fn consume(&self, jti: &str, expires_at: i64) -> Result<(), VerificationError> {
        self.consume_at(Utc::now().timestamp(), jti, expires_at)
    }

    fn consume_at(
        &self,
        now: i64,
        jti: &str,
        expires_at: i64,
    ) -> Result<(), VerificationError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.retain(|_, exp| *exp >= now);
        if inner.contains_key(jti) {
            return Err(VerificationError::Consumed);
        }
        inner.insert(jti.to_string(), expires_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_consume_is_a_replay() {
        let consumed = ConsumedTokens::default();
        assert!(consumed.consume_at(0, "jti-1", 3600).is_ok());
        assert_eq!(
            consumed.consume_at(1, "jti-1", 3600),
            Err(VerificationError::Consumed)
        );
    }

    #[test]
    fn distinct_ids_do_not_interfere() {
        let consumed = ConsumedTokens::default();
        assert!(consumed.consume_at(0, "jti-1", 3600).is_ok());
        assert!(consumed.consume_at(0, "jti-2", 3600).is_ok());
    }

    #[test]
    fn expired_entries_are_evicted() {
        let consumed = ConsumedTokens::default();
        assert!(consumed.consume_at(0, "jti-1", 10).is_ok());
        assert!(consumed.consume_at(0, "jti-2", 3600).is_ok());

        // jti-1 expired at 10, so its entry may be dropped; jti-2 must stay
        assert!(consumed.consume_at(11, "jti-1", 3600).is_ok());
        assert_eq!(
            consumed.consume_at(11, "jti-2", 3600),
            Err(VerificationError::Consumed)
        );
    }
}
