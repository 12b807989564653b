use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a sealed session token stays valid.
const SESSION_TTL_HOURS: i64 = 24 * 7;

/// Claims carried by the session cookie token.
///
/// The cookie never holds session state itself, only the store key, so a
/// client can't read or forge session contents; it can at most replay its
/// own id, which the signature and expiry bound.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// The session id the token resolves to in the store.
    pub sid: Uuid,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Seals a session id into a signed token suitable for a cookie value.
///
/// # Arguments
/// * `session_id` - The store key to seal.
/// * `secret` - The signing secret from the application [`Config`](crate::config::Config).
///
/// # Returns
/// A `Result` containing the token string if successful.
/// Returns `AppError::InternalServerError` if token encoding fails.
pub fn seal(session_id: Uuid, secret: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(SESSION_TTL_HOURS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = SessionClaims {
        sid: session_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to seal session token: {}", e)))
}

/// Opens a sealed token and returns the session id it carries.
///
/// Default validation checks are applied (signature, expiration).
///
/// # Returns
/// A `Result` containing the session id if the token is valid.
/// Returns `AppError::Unauthorized` if the token is malformed, its signature
/// is invalid, or it has expired.
pub fn open(token: &str, secret: &str) -> Result<Uuid, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sid)
    .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_and_open_round_trip() {
        let sid = Uuid::new_v4();
        let token = seal(sid, "test_secret_for_round_trip").unwrap();
        let opened = open(&token, "test_secret_for_round_trip").unwrap();
        assert_eq!(opened, sid);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expiration = chrono::Utc::now()
            .checked_sub_signed(chrono::Duration::hours(2))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims_expired = SessionClaims {
            sid: Uuid::new_v4(),
            exp: expiration,
        };
        let expired_token = encode(
            &Header::default(),
            &claims_expired,
            &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
        )
        .unwrap();

        match open(&expired_token, "test_secret_for_expiration") {
            Err(AppError::Unauthorized(msg)) => {
                assert!(msg.contains("ExpiredSignature"));
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let sid = Uuid::new_v4();
        let token = seal(sid, "secret_one").unwrap();

        match open(&token, "a_completely_different_secret") {
            Err(AppError::Unauthorized(msg)) => {
                // jsonwebtoken reports InvalidSignature when only the key
                // differs, InvalidToken for generally malformed input.
                assert!(msg.contains("InvalidSignature") || msg.contains("InvalidToken"));
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(open("definitely-not-a-jwt", "secret").is_err());
    }
}
