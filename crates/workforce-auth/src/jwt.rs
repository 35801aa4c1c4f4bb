//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use workforce_db::Role;

use crate::error::AuthError;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (employee email)
    pub sub: String,
    /// Employee role
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly signed token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager signing with HS256
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; a token is rejected as soon as `exp` has passed
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            token_ttl,
        }
    }

    /// Lifetime given to tokens issued with [`JwtManager::generate_token`]
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Generate a token for an employee using the configured lifetime
    pub fn generate_token(&self, subject: &str, role: Role) -> Result<IssuedToken, AuthError> {
        self.generate_token_with_ttl(subject, role, self.token_ttl)
    }

    /// Generate a token with an explicit lifetime
    pub fn generate_token_with_ttl(
        &self,
        subject: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        debug!("Generating token for employee: {}", subject);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret-key", Duration::hours(24))
    }

    #[test]
    fn test_token_generation_and_validation() {
        let manager = manager();

        let issued = manager.generate_token("a@x.com", Role::User).unwrap();
        let claims = manager.validate_token(&issued.token).unwrap();

        assert_eq!(claims.sub, "a@x.com");
        assert_eq!(claims.role, Role::User);
        assert!(claims.exp > Utc::now().timestamp());
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_admin_role_survives_round_trip() {
        let manager = manager();
        let issued = manager.generate_token("root@x.com", Role::Admin).unwrap();
        assert_eq!(manager.validate_token(&issued.token).unwrap().role, Role::Admin);
    }

    #[test]
    fn test_expired_token() {
        let manager = manager();

        let issued = manager
            .generate_token_with_ttl("a@x.com", Role::User, Duration::hours(-1))
            .unwrap();
        let result = manager.validate_token(&issued.token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_altered_signature() {
        let manager = manager();
        let issued = manager.generate_token("a@x.com", Role::User).unwrap();

        let (signed, signature) = issued.token.rsplit_once('.').unwrap();
        let first = if signature.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", signed, first, &signature[1..]);

        let result = manager.validate_token(&tampered);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let other = JwtManager::new("another-secret", Duration::hours(24));
        let issued = other.generate_token("a@x.com", Role::Admin).unwrap();

        let result = manager().validate_token(&issued.token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_malformed_token() {
        let result = manager().validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::MalformedToken)));
    }
}
