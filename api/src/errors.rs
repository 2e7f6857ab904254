//! Mapping from domain errors to HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use rn_core::errors::DomainError;
use rn_shared::types::ErrorBody;

/// Newtype over [`DomainError`] carrying the HTTP mapping.
///
/// Conflicts deliberately map to 400 rather than 409: the clients treat
/// a lost booking race the same as any other rejected request.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            DomainError::Validation { .. } | DomainError::Conflict { .. } => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let DomainError::Internal { message } = &self.0 {
            tracing::error!(error = %message, "request failed with internal error");
        }
        HttpResponse::build(self.status_code())
            .json(ErrorBody::new(self.0.code(), self.0.to_string()))
    }
}

/// Shorthand for handler return types
pub type ApiResult<T> = Result<T, ApiError>;

/// Flattens `validator` failures into one message in the domain taxonomy
pub fn validation_failed(errors: validator::ValidationErrors) -> ApiError {
    let detail = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ");
    ApiError(DomainError::validation(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(DomainError::conflict("taken")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DomainError::not_found("Apartment")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(DomainError::unauthenticated("no token")).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError(DomainError::forbidden("admins only")).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
