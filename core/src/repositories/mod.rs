//! Repository traits and in-memory mock implementations.
//!
//! Each submodule defines the persistence contract for one entity. The
//! traits are async-first and return [`DomainError`](crate::errors::DomainError)
//! so that services stay independent of the storage backend. The MySQL
//! implementations live in the `rn_infra` crate; the mocks here back the
//! service unit tests and the API integration tests.

pub mod admin;
pub mod agent;
pub mod analytics;
pub mod apartment;
pub mod booking;
pub mod favorite;
pub mod inspection;
pub mod notification;
pub mod payment;
pub mod report;
pub mod review;
pub mod user;

pub use admin::{AdminRepository, MockAdminRepository};
pub use agent::{AgentRepository, MockAgentRepository};
pub use analytics::{AnalyticsRepository, MockAnalyticsRepository};
pub use apartment::{ApartmentFilter, ApartmentRepository, MockApartmentRepository};
pub use booking::{BookingRepository, MockBookingRepository};
pub use favorite::{FavoriteRepository, MockFavoriteRepository};
pub use inspection::{InspectionRepository, MockInspectionRepository};
pub use notification::{MockNotificationRepository, NotificationFilter, NotificationRepository};
pub use payment::{MockPaymentRepository, PaymentRepository};
pub use report::{MockReportRepository, ReportRepository};
pub use review::{MockReviewRepository, ReviewRepository};
pub use user::{MockUserRepository, UserRepository};
