//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors
///
/// Every service operation reports failures through this taxonomy; the api
/// layer maps each variant onto an HTTP status and a JSON error body.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Missing or invalid input fields (400)
    #[error("{message}")]
    Validation { message: String },

    /// Duplicate booking/review/favorite, unavailable apartment (400)
    #[error("{message}")]
    Conflict { message: String },

    /// Missing, malformed, or stale credential (401)
    #[error("{message}")]
    Unauthenticated { message: String },

    /// Wrong role or non-owner (403)
    #[error("{message}")]
    Forbidden { message: String },

    /// Missing entity (404)
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Database or unexpected error (500)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable error code used in JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Conflict { .. } => "CONFLICT",
            Self::Unauthenticated { .. } => "UNAUTHENTICATED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DomainError::not_found("Apartment");
        assert_eq!(err.to_string(), "Apartment not found");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_conflict_message_passthrough() {
        let err = DomainError::conflict("Apartment is not available for booking");
        assert_eq!(err.to_string(), "Apartment is not available for booking");
        assert_eq!(err.code(), "CONFLICT");
    }
}
