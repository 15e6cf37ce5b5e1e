//! Bearer-token sessions.
//!
//! A token is an HS256 JWT carrying the username, admin flag, expiry and a
//! token id. Logging out records the token id until the token would have
//! expired anyway; that revocation list is the only state shared across
//! requests.

use std::collections::HashMap;
use std::sync::Mutex;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;
use uuid::Uuid;

use marquee_types::api::Claims;

use crate::error::ApiError;

pub struct SessionStore {
    secret: String,
    ttl: chrono::Duration,
    /// Revoked token id -> its expiry timestamp.
    revoked: Mutex<HashMap<String, i64>>,
}

impl SessionStore {
    pub fn new(secret: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
            revoked: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, username: &str, is_admin: bool) -> Result<String, ApiError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Unexpected(format!("token encoding failed: {e}")))
    }

    /// Decode and check a token. Bad signatures, expired tokens and revoked
    /// tokens are all `Unauthorized`.
    pub fn resolve(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!("Rejected session token: {}", e);
            ApiError::unauthorized()
        })?
        .claims;

        if self.revoked()?.contains_key(&claims.jti) {
            return Err(ApiError::unauthorized());
        }
        Ok(claims)
    }

    pub fn revoke(&self, claims: &Claims) -> Result<(), ApiError> {
        let now = chrono::Utc::now().timestamp();
        let mut revoked = self.revoked()?;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti.clone(), claims.exp);
        Ok(())
    }

    fn revoked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, i64>>, ApiError> {
        self.revoked
            .lock()
            .map_err(|e| ApiError::Unexpected(format!("session store lock poisoned: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new("test-secret", chrono::Duration::hours(1))
    }

    #[test]
    fn issued_token_resolves_to_its_user() {
        let sessions = store();
        let token = sessions.issue("ana", true).unwrap();
        let claims = sessions.resolve(&token).unwrap();
        assert_eq!(claims.sub, "ana");
        assert!(claims.is_admin);
    }

    #[test]
    fn revoked_token_is_rejected() {
        let sessions = store();
        let token = sessions.issue("ana", false).unwrap();
        let claims = sessions.resolve(&token).unwrap();
        sessions.revoke(&claims).unwrap();
        assert!(matches!(sessions.resolve(&token), Err(ApiError::Unauthorized(_))));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = SessionStore::new("other", chrono::Duration::hours(1))
            .issue("ana", true)
            .unwrap();
        assert!(store().resolve(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let sessions = SessionStore::new("test-secret", chrono::Duration::hours(-2));
        let token = sessions.issue("ana", false).unwrap();
        assert!(sessions.resolve(&token).is_err());
    }
}
