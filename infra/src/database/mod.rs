//! Database access: connection pooling and MySQL repositories.

pub mod connection;
pub mod mysql;

pub use connection::create_pool;
pub use mysql::{
    MySqlAdminRepository, MySqlAgentRepository, MySqlAnalyticsRepository,
    MySqlApartmentRepository, MySqlBookingRepository, MySqlFavoriteRepository,
    MySqlInspectionRepository, MySqlNotificationRepository, MySqlPaymentRepository,
    MySqlReportRepository, MySqlReviewRepository, MySqlUserRepository,
};
