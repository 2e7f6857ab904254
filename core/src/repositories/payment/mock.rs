//! Mock implementation of PaymentRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Payment, PaymentStatus};
use crate::errors::DomainError;

use super::trait_::PaymentRepository;

/// In-memory payment repository
#[derive(Clone, Default)]
pub struct MockPaymentRepository {
    payments: Arc<RwLock<HashMap<Uuid, Payment>>>,
}

impl MockPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for MockPaymentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, DomainError> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn create(&self, payment: Payment) -> Result<Payment, DomainError> {
        let mut payments = self.payments.write().await;
        if payments
            .values()
            .any(|p| p.transaction_id == payment.transaction_id)
        {
            return Err(DomainError::conflict("Duplicate transaction id"));
        }
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn update(&self, payment: Payment) -> Result<Payment, DomainError> {
        let mut payments = self.payments.write().await;
        if !payments.contains_key(&payment.id) {
            return Err(DomainError::not_found("Payment"));
        }
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().await;
        let mut mine: Vec<Payment> = payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().await;
        let mut matched: Vec<Payment> = payments
            .values()
            .filter(|p| p.booking_id == Some(booking_id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn find_all(&self) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().await;
        let mut all: Vec<Payment> = payments.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_refund_pending(&self) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().await;
        let mut matched: Vec<Payment> = payments
            .values()
            .filter(|p| p.status == PaymentStatus::RefundPending)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.refund_requested_at.cmp(&b.refund_requested_at));
        Ok(matched)
    }

    async fn find_due_pending(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Payment>, DomainError> {
        let payments = self.payments.read().await;
        let mut due: Vec<Payment> = payments
            .values()
            .filter(|p| p.is_due_for_settlement(now))
            .cloned()
            .collect();
        due.sort_by(|a, b| a.settle_after.cmp(&b.settle_after));
        due.truncate(limit as usize);
        Ok(due)
    }

    async fn mark_completed_if_pending(
        &self,
        id: Uuid,
    ) -> Result<Option<Payment>, DomainError> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(&id) {
            Some(payment) if payment.status == PaymentStatus::Pending => {
                payment.settle();
                Ok(Some(payment.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let payments = self.payments.read().await;
        Ok(payments.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PaymentMethod;
    use chrono::Duration;

    fn sample(txn: &str, settle_delay: Duration) -> Payment {
        Payment::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            None,
            800.0,
            PaymentMethod::Card,
            "USD".to_string(),
            txn.to_string(),
            settle_delay,
        )
    }

    #[tokio::test]
    async fn test_settlement_transition_runs_once() {
        let repo = MockPaymentRepository::new();
        let payment = repo
            .create(sample("TXN1", Duration::seconds(-1)))
            .await
            .unwrap();

        let settled = repo
            .mark_completed_if_pending(payment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settled.status, PaymentStatus::Completed);
        assert!(settled.paid_at.is_some());

        // A second pass sees nothing to do
        assert!(repo
            .mark_completed_if_pending(payment.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_due_query_respects_settle_after() {
        let repo = MockPaymentRepository::new();
        repo.create(sample("TXN-due", Duration::seconds(-5)))
            .await
            .unwrap();
        repo.create(sample("TXN-later", Duration::minutes(5)))
            .await
            .unwrap();

        let due = repo.find_due_pending(Utc::now(), 10).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].transaction_id, "TXN-due");
    }
}
