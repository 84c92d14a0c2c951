//! JWT session tokens.
//!
//! Handles token generation and validation. Claims carry the user and
//! tenant ids for convenience, but verification re-reads the user row;
//! see [`crate::service::AuthService::verify`].

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Tenant the user belonged to when the token was issued
    pub tenant_id: String,

    /// Role at issue time (display hint; authorization re-checks the row)
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// Issues and validates session tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: String,
    session_lifetime_secs: i64,
}

impl TokenService {
    /// Create a new token service.
    pub fn new(secret: String, session_lifetime_secs: i64) -> Self {
        TokenService {
            secret,
            session_lifetime_secs,
        }
    }

    /// Generate a session token for a user.
    pub fn issue(&self, user_id: &str, tenant_id: &str, role: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.session_lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Get remaining lifetime of a token in seconds.
    pub fn remaining_lifetime(&self, token: &str) -> Result<i64, AuthError> {
        let claims = self.validate(token)?;
        let now = Utc::now().timestamp();
        Ok(claims.exp - now)
    }
}

/// Extract bearer token from an authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let tokens = TokenService::new("test-secret".to_string(), 3600);

        let token = tokens.issue("user-001", "tenant-001", "admin").unwrap();
        let claims = tokens.validate(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.tenant_id, "tenant-001");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let tokens = TokenService::new("test-secret".to_string(), 3600);
        let other = TokenService::new("other-secret".to_string(), 3600);

        let token = tokens.issue("user-001", "tenant-001", "admin").unwrap();
        assert!(matches!(
            other.validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = TokenService::new("test-secret".to_string(), 3600);
        assert!(matches!(
            tokens.validate("garbage.token.here"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_remaining_lifetime() {
        let tokens = TokenService::new("test-secret".to_string(), 3600);
        let token = tokens.issue("user-001", "tenant-001", "admin").unwrap();

        let remaining = tokens.remaining_lifetime(&token).unwrap();
        assert!(remaining > 3500 && remaining <= 3600);
    }
}
