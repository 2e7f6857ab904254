//! Payment entity and its lifecycle.
//!
//! Lifecycle: `pending -> completed -> {refund_pending -> refunded |
//! completed}` or `pending -> failed`. A payment is created pending with a
//! persisted `settle_after` instant; the settlement worker later drives the
//! pending -> completed transition, so a restart never loses an in-flight
//! settlement.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days after `paid_at` during which a refund may be requested
pub const REFUND_WINDOW_DAYS: i64 = 7;

/// Payment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    RefundPending,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::RefundPending => "refund_pending",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            "refund_pending" => Some(Self::RefundPending),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Supported payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    MobileMoney,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::MobileMoney => "mobile_money",
            Self::Cash => "cash",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "card" => Some(Self::Card),
            "bank_transfer" => Some(Self::BankTransfer),
            "mobile_money" => Some(Self::MobileMoney),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

/// A payment made by a user towards a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub apartment_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub currency: String,
    pub status: PaymentStatus,

    /// Unique gateway-style transaction identifier
    pub transaction_id: String,

    /// Set once; a second refund request is rejected
    pub refund_requested: bool,
    pub refund_reason: Option<String>,
    pub refund_requested_at: Option<DateTime<Utc>>,
    pub refund_processed_at: Option<DateTime<Utc>>,

    pub paid_at: Option<DateTime<Utc>>,

    /// Persisted settlement intent: the worker completes the payment once
    /// this instant has passed
    pub settle_after: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new pending payment due for settlement after `settle_delay`
    pub fn new(
        user_id: Uuid,
        apartment_id: Uuid,
        booking_id: Option<Uuid>,
        amount: f64,
        method: PaymentMethod,
        currency: String,
        transaction_id: String,
        settle_delay: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            apartment_id,
            booking_id,
            amount,
            method,
            currency,
            status: PaymentStatus::Pending,
            transaction_id,
            refund_requested: false,
            refund_reason: None,
            refund_requested_at: None,
            refund_processed_at: None,
            paid_at: None,
            settle_after: now + settle_delay,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Whether the settlement instant has passed for a still-pending payment
    pub fn is_due_for_settlement(&self, now: DateTime<Utc>) -> bool {
        self.status == PaymentStatus::Pending && self.settle_after <= now
    }

    /// Marks the payment completed, stamping `paid_at`
    pub fn settle(&mut self) {
        self.status = PaymentStatus::Completed;
        self.paid_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Whether a refund may be requested at `now`
    ///
    /// Allowed only from completed, only once, and only within
    /// [`REFUND_WINDOW_DAYS`] of `paid_at`.
    pub fn refund_window_open(&self, now: DateTime<Utc>) -> bool {
        if self.status != PaymentStatus::Completed || self.refund_requested {
            return false;
        }
        match self.paid_at {
            Some(paid_at) => now - paid_at <= Duration::days(REFUND_WINDOW_DAYS),
            None => false,
        }
    }

    /// Records a refund request, moving to refund_pending
    pub fn request_refund(&mut self, reason: Option<String>) {
        self.refund_requested = true;
        self.refund_reason = reason;
        self.refund_requested_at = Some(Utc::now());
        self.status = PaymentStatus::RefundPending;
        self.updated_at = Utc::now();
    }

    /// Applies an admin refund approval
    pub fn approve_refund(&mut self) {
        self.status = PaymentStatus::Refunded;
        self.refund_processed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Applies an admin refund rejection, reverting to completed
    pub fn reject_refund(&mut self) {
        self.refund_requested = false;
        self.status = PaymentStatus::Completed;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Payment {
        Payment::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            1500.0,
            PaymentMethod::Card,
            "USD".to_string(),
            "TXN1700000000000042".to_string(),
            Duration::seconds(2),
        )
    }

    #[test]
    fn test_new_payment_is_pending() {
        let payment = sample();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.paid_at.is_none());
        assert!(!payment.refund_requested);
    }

    #[test]
    fn test_due_for_settlement() {
        let payment = sample();
        assert!(!payment.is_due_for_settlement(Utc::now()));
        assert!(payment.is_due_for_settlement(Utc::now() + Duration::seconds(5)));
    }

    #[test]
    fn test_settle_stamps_paid_at() {
        let mut payment = sample();
        payment.settle();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.paid_at.is_some());
    }

    #[test]
    fn test_refund_window() {
        let mut payment = sample();
        // Pending payments are never refundable
        assert!(!payment.refund_window_open(Utc::now()));

        payment.settle();
        assert!(payment.refund_window_open(Utc::now()));

        // Outside the 7 day window
        let late = Utc::now() + Duration::days(REFUND_WINDOW_DAYS) + Duration::hours(1);
        assert!(!payment.refund_window_open(late));

        // Only once
        payment.request_refund(None);
        assert!(!payment.refund_window_open(Utc::now()));
        assert_eq!(payment.status, PaymentStatus::RefundPending);
    }

    #[test]
    fn test_refund_rejection_reverts_to_completed() {
        let mut payment = sample();
        payment.settle();
        payment.request_refund(Some("changed my mind".to_string()));
        payment.reject_refund();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(!payment.refund_requested);
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
            PaymentStatus::RefundPending,
            PaymentStatus::Cancelled,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()), Some(status));
        }
    }
}
