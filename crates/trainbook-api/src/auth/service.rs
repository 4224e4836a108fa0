//! Authentication service layer
//!
//! Resolves bearer tokens to user records and implements the login/signup
//! pair. Owns a store handle plus the JWT and password configurations;
//! constructed once in `main` and shared through `AppState`.

use uuid::Uuid;

use trainbook_core::{AuthConfig, NewUser, Store, User};

use super::jwt::{generate_access_token, validate_access_token, JwtConfig};
use super::password::{hash_password, verify_password, PasswordConfig};
use crate::error::ApiError;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Store,
    jwt: JwtConfig,
    passwords: PasswordConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: Store, config: &AuthConfig) -> Self {
        Self {
            store,
            jwt: JwtConfig::from(config),
            passwords: PasswordConfig::from(config),
        }
    }

    /// Resolve a bearer credential to the user it belongs to
    ///
    /// Any failure along the way (missing header, malformed or expired
    /// token, unknown user) collapses to `Unauthenticated`; the caller
    /// learns nothing about which step rejected the credential.
    pub async fn authenticate(&self, bearer: Option<&str>) -> Result<User, ApiError> {
        let token = extract_bearer(bearer)?;

        let claims =
            validate_access_token(&self.jwt, token).map_err(|_| ApiError::Unauthenticated)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthenticated)?;

        self.store
            .find_user(user_id)
            .await?
            .ok_or(ApiError::Unauthenticated)
    }

    /// Login with email and password, returning a fresh token and the user
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller: both are `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), ApiError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| ApiError::Internal(format!("Failed to verify password: {e}")))?;

        if !password_valid {
            return Err(ApiError::InvalidCredentials);
        }

        let token = generate_access_token(&self.jwt, user.id)
            .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))?;

        Ok((token, user))
    }

    /// Create a new account and log it in
    ///
    /// The password is hashed before it reaches the store; the plaintext
    /// exists only for the duration of this call. New accounts start with
    /// neither the admin nor the blocked flag set.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<(String, User), ApiError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(ApiError::BadRequest("Invalid email format".to_string()));
        }
        if password.is_empty() {
            return Err(ApiError::BadRequest("Password must not be empty".to_string()));
        }

        let password_hash = hash_password(password, &self.passwords)
            .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;

        let user = self
            .store
            .create_user(&NewUser {
                email: email.to_string(),
                password_hash,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            })
            .await
            .map_err(|e| match e {
                trainbook_core::CoreError::UniqueViolation(_) => ApiError::DuplicateEmail,
                other => ApiError::from(other),
            })?;

        let token = generate_access_token(&self.jwt, user.id)
            .map_err(|e| ApiError::Internal(format!("Failed to generate token: {e}")))?;

        Ok((token, user))
    }
}

/// Pull the token out of an `Authorization` header value
fn extract_bearer(header: Option<&str>) -> Result<&str, ApiError> {
    header
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_accepts_well_formed_header() {
        let token = extract_bearer(Some("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_rejects_missing_header() {
        assert!(matches!(
            extract_bearer(None),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn test_extract_bearer_rejects_malformed_headers() {
        for header in ["abc.def.ghi", "bearer abc", "Bearer", "Bearer ", "Basic abc"] {
            assert!(
                matches!(extract_bearer(Some(header)), Err(ApiError::Unauthenticated)),
                "accepted malformed header: {header:?}"
            );
        }
    }
}
