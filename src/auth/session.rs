//! Session data for the signed-in user

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Error;

/// Session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The ID token sent as bearer token
    pub id_token: String,

    /// The refresh token
    pub refresh_token: String,

    /// The user ID
    pub user_id: String,

    /// The user's email, when the token carries one
    pub email: Option<String>,

    /// The expiry timestamp in seconds since the epoch
    pub expires_at: i64,
}

/// Claims read from an ID token
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    exp: i64,
    #[serde(default)]
    email: Option<String>,
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs() as i64
}

impl Session {
    /// Create a new session expiring `expires_in` seconds from now
    pub fn new(id_token: String, refresh_token: String, user_id: String, expires_in: i64) -> Self {
        Self {
            id_token,
            refresh_token,
            user_id,
            email: None,
            expires_at: now() + expires_in,
        }
    }

    /// Build a session from an ID token issued by the auth backend.
    ///
    /// The token signature is not verified here; the document store verifies
    /// it on every request. Only `sub`, `exp` and `email` are read.
    pub fn from_id_token(id_token: &str, refresh_token: &str) -> Result<Self, Error> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<IdTokenClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)?;

        Ok(Self {
            id_token: id_token.to_string(),
            refresh_token: refresh_token.to_string(),
            user_id: data.claims.sub,
            email: data.claims.email,
            expires_at: data.claims.exp,
        })
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        now() >= self.expires_at
    }
}
