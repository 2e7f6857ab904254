pub mod service;

pub use service::{AnalyticsService, RevenueReport, UserReport};
