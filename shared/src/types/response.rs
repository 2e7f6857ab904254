//! Common API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic success envelope wrapping a payload with a human-readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Message-only response body for operations without a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error response body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_serialization() {
        let body = MessageResponse::new("Booking cancelled successfully");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Booking cancelled successfully");
    }

    #[test]
    fn test_error_body() {
        let body = ErrorBody::new("NOT_FOUND", "Apartment not found");
        assert_eq!(body.error, "NOT_FOUND");
    }
}
