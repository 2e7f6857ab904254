//! MySQL repository implementations.

pub mod admin_repository_impl;
pub mod agent_repository_impl;
pub mod analytics_repository_impl;
pub mod apartment_repository_impl;
pub mod booking_repository_impl;
pub mod favorite_repository_impl;
pub mod inspection_repository_impl;
pub mod notification_repository_impl;
pub mod payment_repository_impl;
pub mod report_repository_impl;
pub mod review_repository_impl;
pub mod user_repository_impl;

pub use admin_repository_impl::MySqlAdminRepository;
pub use agent_repository_impl::MySqlAgentRepository;
pub use analytics_repository_impl::MySqlAnalyticsRepository;
pub use apartment_repository_impl::MySqlApartmentRepository;
pub use booking_repository_impl::MySqlBookingRepository;
pub use favorite_repository_impl::MySqlFavoriteRepository;
pub use inspection_repository_impl::MySqlInspectionRepository;
pub use notification_repository_impl::MySqlNotificationRepository;
pub use payment_repository_impl::MySqlPaymentRepository;
pub use report_repository_impl::MySqlReportRepository;
pub use review_repository_impl::MySqlReviewRepository;
pub use user_repository_impl::MySqlUserRepository;

use rn_core::errors::DomainError;

/// Wraps a database error with the operation that failed
pub(crate) fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{context}: {e}"),
    }
}

/// Wraps a row-decoding error
pub(crate) fn column_err(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to read column {column}: {e}"),
    }
}

/// Parses a stored UUID string
pub(crate) fn parse_uuid(column: &str, value: &str) -> Result<uuid::Uuid, DomainError> {
    uuid::Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in column {column}: {e}"),
    })
}

/// Parses a stored enum token via the entity's `parse`
pub(crate) fn parse_enum<T>(
    column: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, DomainError> {
    parse(value).ok_or_else(|| DomainError::Internal {
        message: format!("Unknown value '{value}' in column {column}"),
    })
}
