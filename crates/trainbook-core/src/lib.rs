//! Trainbook Core - Domain models, configuration, and storage
//!
//! This crate defines the shared building blocks of the trainbook system:
//! - Booking domain models (users, trainings, reservations, checkins, feedback)
//! - Common error types
//! - Configuration management
//! - PostgreSQL store (SQLx)

pub mod config;
pub mod store;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use store::Store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for trainbook operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================================================
// Users
// ============================================================================

/// User account model
///
/// Represents a member of the gym with their credentials and access flags.
/// `is_admin` and `is_blocked` are independent: a blocked admin is a valid
/// (if unusual) state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,

    /// User's email address (unique, used for login)
    pub email: String,

    /// Hashed password (Argon2id PHC string)
    /// This field is never serialized in API responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// User's first name
    pub first_name: String,

    /// User's last name
    pub last_name: String,

    /// Whether the user can perform administrative operations
    pub is_admin: bool,

    /// Whether the user is blocked from self-service operations
    pub is_blocked: bool,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a new user
///
/// The password must already be hashed; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

// ============================================================================
// Catalog: training types and places
// ============================================================================

/// A kind of training offered by the gym (e.g. spinning, crossfit)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A location where trainings are held
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
}

// ============================================================================
// Trainings
// ============================================================================

/// A scheduled training session with its eager-loaded type and place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    pub id: Uuid,
    pub date: NaiveDate,
    pub training_type: TrainingType,
    pub place: Place,
}

// ============================================================================
// Reservations, checkins, feedback
// ============================================================================

/// A user's reservation for a training, with both sides eager-loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub user: User,
    pub training: Training,
    pub created_at: DateTime<Utc>,
}

/// A gym checkin with its eager-loaded user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkin {
    pub id: Uuid,
    pub user: User,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Feedback a user left for a training, with the training eager-loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub training: Training,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$secret".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            is_admin: false,
            is_blocked: false,
            created_at: Utc::now(),
        }
    }

    fn sample_training() -> Training {
        Training {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            training_type: TrainingType {
                id: Uuid::new_v4(),
                name: "Spinning".to_string(),
                description: None,
            },
            place: Place {
                id: Uuid::new_v4(),
                name: "Main hall".to_string(),
                address: Some("1 Gym St".to_string()),
            },
        }
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("test@example.com"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_blocked_admin_is_representable() {
        let mut user = sample_user();
        user.is_admin = true;
        user.is_blocked = true;

        assert!(user.is_admin);
        assert!(user.is_blocked);
    }

    #[test]
    fn test_training_serialization() {
        let training = sample_training();

        let json = serde_json::to_value(&training).unwrap();
        assert_eq!(json["training_type"]["name"], "Spinning");
        assert_eq!(json["place"]["address"], "1 Gym St");
        assert_eq!(json["date"], "2025-06-01");
    }

    #[test]
    fn test_reservation_serialization_hides_password_hash() {
        let reservation = Reservation {
            id: Uuid::new_v4(),
            user: sample_user(),
            training: sample_training(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&reservation).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(json.contains("Spinning"));
    }
}
