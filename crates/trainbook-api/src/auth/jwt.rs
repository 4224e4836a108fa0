//! JWT token generation and validation
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing. The token
//! embeds only the user id; resolving the full user record always goes
//! through the store.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use trainbook_core::AuthConfig;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user ID
    pub sub: String,
    /// JWT ID - unique token identifier
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Access token expiration time in seconds
    pub access_expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-key-change-in-production".to_string(),
            access_expiration_secs: 3600, // 1 hour
            issuer: "trainbook-api".to_string(),
        }
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_expiration_secs: config.access_expiration_secs,
            issuer: config.issuer.clone(),
        }
    }
}

/// Generate a JWT access token for an authenticated user
///
/// The claims embed the user id as `sub`; everything else is bookkeeping
/// (issuer, token id, issue/expiry times).
pub fn generate_access_token(config: &JwtConfig, user_id: Uuid) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user_id.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + config.access_expiration_secs,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT access token and extract claims
///
/// Fails when the signature does not verify, the token has expired, or the
/// issuer does not match.
pub fn validate_access_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_validate_token() {
        let config = JwtConfig::default();
        let user_id = Uuid::new_v4();

        let token = generate_access_token(&config, user_id).expect("Failed to generate token");
        let claims = validate_access_token(&config, &token).expect("Failed to validate token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, "trainbook-api");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let config = JwtConfig::default();
        let result = validate_access_token(&config, "invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = JwtConfig {
            secret: "secret1".to_string(),
            ..Default::default()
        };
        let config2 = JwtConfig {
            secret: "secret2".to_string(),
            ..Default::default()
        };

        let token = generate_access_token(&config1, Uuid::new_v4()).unwrap();

        let result = validate_access_token(&config2, &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let config = JwtConfig::default();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Create a token that expired 1 hour ago
        let claims = Claims {
            iss: config.issuer.clone(),
            sub: Uuid::new_v4().to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now - 7200, // Issued 2 hours ago
            exp: now - 3600, // Expired 1 hour ago
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = validate_access_token(&config, &token);
        assert!(matches!(result, Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_wrong_issuer() {
        let issue_config = JwtConfig {
            issuer: "someone-else".to_string(),
            ..Default::default()
        };
        let config = JwtConfig::default();

        let token = generate_access_token(&issue_config, Uuid::new_v4()).unwrap();

        let result = validate_access_token(&config, &token);
        assert!(result.is_err());
    }
}
