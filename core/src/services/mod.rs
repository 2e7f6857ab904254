//! Business logic services.
//!
//! Services own the marketplace rules and orchestrate repositories; they
//! hold `Arc<dyn Repository>` handles so the api layer can wire either the
//! MySQL implementations or the in-memory mocks behind the same state type.

pub mod admin;
pub mod analytics;
pub mod apartment;
pub mod auth;
pub mod booking;
pub mod favorite;
pub mod inspection;
pub mod notification;
pub mod payment;
pub mod report;
pub mod review;
pub mod token;

pub use admin::AdminService;
pub use analytics::{AnalyticsService, RevenueReport, UserReport};
pub use apartment::{ApartmentService, NewApartment, UpdateApartment};
pub use auth::{Authenticated, AuthService};
pub use booking::BookingService;
pub use favorite::FavoriteService;
pub use inspection::InspectionService;
pub use notification::NotificationService;
pub use payment::{PaymentService, SettlementWorker};
pub use report::ReportService;
pub use review::ReviewService;
pub use token::TokenService;
