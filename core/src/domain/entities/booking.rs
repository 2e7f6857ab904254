//! Booking entity and its lifecycle.
//!
//! Lifecycle: `pending -> {approved, rejected, cancelled}`, plus `confirmed`
//! which is only reached when a payment for the booking settles. A booking
//! in pending or approved status is "active" and holds the apartment's
//! availability slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    /// Payment settled for this booking
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            "confirmed" => Some(Self::Confirmed),
            _ => None,
        }
    }

    /// Active bookings hold the apartment's availability slot
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

/// Payment state mirrored onto the booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingPaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

impl BookingPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "refunded" => Some(Self::Refunded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A booking request by a user for an apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub apartment_id: Uuid,
    pub status: BookingStatus,
    pub payment_status: BookingPaymentStatus,
    pub check_in_date: Option<DateTime<Utc>>,
    pub check_out_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new pending booking
    pub fn new(user_id: Uuid, apartment_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            apartment_id,
            status: BookingStatus::Pending,
            payment_status: BookingPaymentStatus::Pending,
            check_in_date: None,
            check_out_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn set_status(&mut self, status: BookingStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Marks the booking as paid after payment settlement
    pub fn confirm_paid(&mut self) {
        self.status = BookingStatus::Confirmed;
        self.payment_status = BookingPaymentStatus::Paid;
        self.updated_at = Utc::now();
    }

    /// Cancels the booking after an approved refund
    pub fn cancel_refunded(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.payment_status = BookingPaymentStatus::Refunded;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_booking_is_pending() {
        let booking = Booking::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, BookingPaymentStatus::Pending);
        assert!(booking.status.is_active());
    }

    #[test]
    fn test_active_statuses() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Approved.is_active());
        assert!(!BookingStatus::Rejected.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
        assert!(!BookingStatus::Confirmed.is_active());
    }

    #[test]
    fn test_confirm_paid() {
        let mut booking = Booking::new(Uuid::new_v4(), Uuid::new_v4());
        booking.confirm_paid();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, BookingPaymentStatus::Paid);
    }

    #[test]
    fn test_cancel_refunded() {
        let mut booking = Booking::new(Uuid::new_v4(), Uuid::new_v4());
        booking.confirm_paid();
        booking.cancel_refunded();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.payment_status, BookingPaymentStatus::Refunded);
    }
}
