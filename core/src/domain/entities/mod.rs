//! Domain entities for the RentNest marketplace.

pub mod admin;
pub mod agent;
pub mod analytics;
pub mod apartment;
pub mod booking;
pub mod favorite;
pub mod inspection;
pub mod notification;
pub mod payment;
pub mod principal;
pub mod report;
pub mod review;
pub mod token;
pub mod user;

pub use admin::Admin;
pub use agent::{Agent, AgentStatus};
pub use analytics::{AnalyticsPeriod, AnalyticsSnapshot, Breakdown, Metrics};
pub use apartment::{Apartment, ApartmentCategory};
pub use booking::{Booking, BookingPaymentStatus, BookingStatus};
pub use favorite::Favorite;
pub use inspection::{InspectionRequest, InspectionStatus};
pub use notification::{Notification, NotificationPriority, NotificationType, RelatedEntity};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use principal::{Principal, Role};
pub use report::{Report, ReportPriority, ReportStatus, ReportType};
pub use review::Review;
pub use token::Claims;
pub use user::User;
