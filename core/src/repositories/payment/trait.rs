//! Payment repository trait.
//!
//! Settlement is driven through `find_due_pending` plus the conditional
//! `mark_completed_if_pending` transition. Both are safe to re-run: a
//! payment already completed by an earlier pass simply stops matching.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::Payment;
use crate::errors::DomainError;

/// Persistence contract for [`Payment`] records
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, DomainError>;

    async fn create(&self, payment: Payment) -> Result<Payment, DomainError>;

    async fn update(&self, payment: Payment) -> Result<Payment, DomainError>;

    /// Payments made by one user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>, DomainError>;

    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>, DomainError>;

    /// All payments, newest first; admin console and analytics
    async fn find_all(&self) -> Result<Vec<Payment>, DomainError>;

    /// Payments with a pending refund request, oldest first
    async fn find_refund_pending(&self) -> Result<Vec<Payment>, DomainError>;

    /// Pending payments whose `settle_after` is at or before `now`,
    /// oldest first, at most `limit`
    async fn find_due_pending(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Payment>, DomainError>;

    /// Atomically moves a payment from pending to completed, stamping
    /// `paid_at`. Returns the updated payment when this call performed the
    /// transition, `None` when the payment was not pending anymore.
    async fn mark_completed_if_pending(&self, id: Uuid)
        -> Result<Option<Payment>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
