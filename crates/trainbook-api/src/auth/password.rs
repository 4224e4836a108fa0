/// Password hashing and verification using Argon2id
///
/// Passwords are stored as PHC strings: the hash carries its algorithm,
/// parameters, and salt, so verification needs no extra configuration.
/// The cost profile comes from `AuthConfig` (memory, iterations, lanes).
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use thiserror::Error;

use trainbook_core::AuthConfig;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Password hashing cost profile
///
/// Increasing memory or iterations improves resistance to brute force but
/// slows down signup and login.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism (lanes)
    pub parallelism: u32,
    /// Output length in bytes
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
            output_len: Some(32),
        }
    }
}

impl From<&AuthConfig> for PasswordConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            memory_cost: config.hash_memory_kib,
            time_cost: config.hash_iterations,
            parallelism: config.hash_parallelism,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    /// Create Argon2 parameters from this configuration
    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

/// Hash a plaintext password using Argon2id with a random salt
///
/// Returns a PHC string safe to store as-is; the salt is embedded in it.
pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// Returns `Ok(false)` on a mismatch; an error only when the stored hash
/// itself cannot be parsed or verified.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lighter cost profile so the tests stay fast
    fn test_config() -> PasswordConfig {
        PasswordConfig {
            memory_cost: 8192,
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let config = test_config();
        let password = "training-time!";
        let hash = hash_password(password, &config).expect("Failed to hash password");

        assert!(verify_password(password, &hash).expect("Verification failed"));
        assert!(!verify_password("wrong-password", &hash).expect("Verification failed"));
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        // Random salt: equal inputs must not collide
        let config = test_config();
        let password = "same-password";

        let hash1 = hash_password(password, &config).unwrap();
        let hash2 = hash_password(password, &config).unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_config_parameters_embedded_in_hash() {
        let config = test_config();
        let hash = hash_password("password", &config).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=8192"));
        assert!(hash.contains("t=1"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_config_from_auth_config() {
        let auth = AuthConfig::default();
        let config = PasswordConfig::from(&auth);

        assert_eq!(config.memory_cost, auth.hash_memory_kib);
        assert_eq!(config.time_cost, auth.hash_iterations);
        assert_eq!(config.parallelism, auth.hash_parallelism);
    }
}
