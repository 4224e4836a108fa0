//! Authentication and authorization module
//!
//! Components:
//! - Token generation and validation (JWT, HS256)
//! - Password hashing with Argon2
//! - Authorization guards (admin, not-blocked)
//! - Authentication service tying tokens to user records

pub mod guards;
pub mod jwt;
pub mod password;
pub mod service;

pub use guards::{require_admin, require_not_blocked};
pub use jwt::{generate_access_token, validate_access_token, Claims, JwtConfig, JwtError};
pub use password::{hash_password, verify_password, PasswordConfig, PasswordError};
pub use service::AuthService;
