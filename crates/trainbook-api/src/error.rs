//! API error handling
//!
//! Every failure surfaces to the GraphQL caller as a structured error with
//! `code` and `status` extensions. Nothing is retried and nothing is
//! swallowed; a failure is terminal for its request.

use thiserror::Error;

use trainbook_core::CoreError;

/// Application error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid or missing authentication token")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database operation failed: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable error code surfaced in GraphQL extensions
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::DuplicateEmail => "DUPLICATE_EMAIL",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-style status code surfaced in GraphQL extensions
    pub fn status(&self) -> i32 {
        match self {
            ApiError::Unauthenticated => 401,
            ApiError::InvalidCredentials => 400,
            ApiError::DuplicateEmail => 400,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::Database(_) => 500,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::UniqueViolation(msg) => ApiError::BadRequest(msg),
            CoreError::ValidationError(msg) => ApiError::BadRequest(msg),
            CoreError::DatabaseError(msg) => ApiError::Database(msg),
            CoreError::ConfigError(msg) => ApiError::Internal(msg),
            CoreError::Other(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl ApiError {
    /// Convert into a GraphQL error carrying `code` and `status` extensions
    pub fn into_graphql(self) -> async_graphql::Error {
        use async_graphql::ErrorExtensions;

        let code = self.code();
        let status = self.status();
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", code);
            e.set("status", status);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_statuses() {
        let cases = vec![
            (ApiError::Unauthenticated, "UNAUTHENTICATED", 401),
            (ApiError::InvalidCredentials, "INVALID_CREDENTIALS", 400),
            (ApiError::DuplicateEmail, "DUPLICATE_EMAIL", 400),
            (ApiError::Forbidden("nope".into()), "FORBIDDEN", 403),
            (ApiError::NotFound("user".into()), "NOT_FOUND", 404),
            (ApiError::BadRequest("bad".into()), "BAD_REQUEST", 400),
            (ApiError::Database("boom".into()), "DATABASE_ERROR", 500),
            (ApiError::Internal("boom".into()), "INTERNAL_ERROR", 500),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::NotFound("training abc".to_string()));
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = ApiError::from(CoreError::DatabaseError("connection reset".to_string()));
        assert!(matches!(err, ApiError::Database(_)));

        let err = ApiError::from(CoreError::UniqueViolation("users_email_key".to_string()));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_graphql_error_extensions() {
        let gql: async_graphql::Error = ApiError::Unauthenticated.into_graphql();
        assert_eq!(gql.message, "Invalid or missing authentication token");

        let extensions = gql.extensions.expect("extensions set");
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("UNAUTHENTICATED"))
        );
        assert_eq!(
            extensions.get("status"),
            Some(&async_graphql::Value::from(401))
        );
    }
}
