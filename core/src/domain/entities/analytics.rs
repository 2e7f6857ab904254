//! Analytics snapshot entity: one set of counters per (date, period).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Aggregation period of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl AnalyticsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Counter set captured by a snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    // User metrics
    pub new_users: u64,
    pub total_users: u64,

    // Agent metrics
    pub new_agents: u64,
    pub approved_agents: u64,
    pub pending_agents: u64,
    pub total_agents: u64,

    // Apartment metrics
    pub new_apartments: u64,
    pub available_apartments: u64,
    pub booked_apartments: u64,
    pub total_apartments: u64,

    // Booking metrics
    pub new_bookings: u64,
    pub confirmed_bookings: u64,
    pub cancelled_bookings: u64,
    pub total_bookings: u64,

    // Inspection metrics
    pub new_inspections: u64,
    pub completed_inspections: u64,
    pub total_inspections: u64,

    // Report metrics
    pub new_reports: u64,
    pub resolved_reports: u64,
    pub open_reports: u64,
    pub total_reports: u64,

    // Payment metrics
    pub new_payments: u64,
    pub total_revenue: f64,
    pub average_transaction: f64,

    // Review metrics
    pub new_reviews: u64,
    pub average_rating: f64,
    pub total_reviews: u64,
}

/// Category, location, and price-range breakdowns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    /// Listing count per category
    pub apartment_categories: HashMap<String, u64>,
    /// Listing count for the most common locations
    pub popular_locations: HashMap<String, u64>,
    /// Listing count per price band
    pub price_ranges: HashMap<String, u64>,
}

/// Price band labels used in [`Breakdown::price_ranges`]
pub const PRICE_BANDS: [(&str, f64, f64); 4] = [
    ("0-500", 0.0, 500.0),
    ("501-1000", 500.0, 1000.0),
    ("1001-2000", 1000.0, 2000.0),
    ("2001+", 2000.0, f64::INFINITY),
];

/// Label of the price band containing `price`
pub fn price_band(price: f64) -> &'static str {
    for (label, low, high) in PRICE_BANDS {
        if price > low && price <= high || (low == 0.0 && price <= high) {
            return label;
        }
    }
    "2001+"
}

/// A persisted analytics snapshot, unique per (date, period)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub id: Uuid,
    pub date: NaiveDate,
    pub period: AnalyticsPeriod,
    pub metrics: Metrics,
    pub breakdown: Breakdown,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsSnapshot {
    pub fn new(date: NaiveDate, period: AnalyticsPeriod, metrics: Metrics, breakdown: Breakdown) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            period,
            metrics,
            breakdown,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_bands() {
        assert_eq!(price_band(0.0), "0-500");
        assert_eq!(price_band(500.0), "0-500");
        assert_eq!(price_band(501.0), "501-1000");
        assert_eq!(price_band(1500.0), "1001-2000");
        assert_eq!(price_band(99999.0), "2001+");
    }

    #[test]
    fn test_period_parse() {
        assert_eq!(AnalyticsPeriod::parse("daily"), Some(AnalyticsPeriod::Daily));
        assert_eq!(AnalyticsPeriod::parse("hourly"), None);
    }
}
