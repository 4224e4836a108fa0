//! Authorization guards
//!
//! Pure predicates over an already-authenticated user. Guards never touch
//! the store; each resolver composes authentication with at most one guard.

use trainbook_core::User;

use crate::error::ApiError;

/// Pass only when the user has the admin flag
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You need to be an admin for this action".to_string(),
        ))
    }
}

/// Fail when the user is blocked
pub fn require_not_blocked(user: &User) -> Result<(), ApiError> {
    if user.is_blocked {
        Err(ApiError::Forbidden(
            "Blocked users cannot perform this action".to_string(),
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(is_admin: bool, is_blocked: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "member@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Member".to_string(),
            last_name: "One".to_string(),
            is_admin,
            is_blocked,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(true, false)).is_ok());

        let err = require_admin(&user(false, false)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_require_not_blocked() {
        assert!(require_not_blocked(&user(false, false)).is_ok());

        let err = require_not_blocked(&user(false, true)).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_flags_are_independent() {
        // A blocked admin still passes the admin guard
        let blocked_admin = user(true, true);
        assert!(require_admin(&blocked_admin).is_ok());
        assert!(require_not_blocked(&blocked_admin).is_err());
    }
}
