//! Background settlement worker.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use super::service::PaymentService;

/// Polls for due pending payments and settles them.
///
/// The worker carries no state of its own; every pass re-reads what is due
/// from the database, so a restart simply resumes where the data says.
pub struct SettlementWorker {
    payments: Arc<PaymentService>,
    poll_interval: Duration,
}

impl SettlementWorker {
    pub fn new(payments: Arc<PaymentService>, poll_interval: Duration) -> Self {
        Self {
            payments,
            poll_interval,
        }
    }

    /// Runs the polling loop forever; spawn this on its own task
    pub async fn run(self) {
        info!(interval_secs = self.poll_interval.as_secs(), "settlement worker started");
        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;
            match self.payments.settle_due(Utc::now()).await {
                Ok(0) => {}
                Ok(settled) => info!(settled, "settlement pass finished"),
                Err(e) => error!(error = %e, "settlement pass failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Apartment, ApartmentCategory, PaymentMethod, Principal, User};
    use crate::repositories::{
        ApartmentRepository, MockApartmentRepository, MockBookingRepository,
        MockNotificationRepository, MockPaymentRepository, MockUserRepository,
    };
    use crate::services::notification::NotificationService;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_worker_settles_pending_payment() {
        let payment_repo = Arc::new(MockPaymentRepository::new());
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        let service = Arc::new(PaymentService::new(
            payment_repo.clone(),
            Arc::new(MockBookingRepository::new()),
            apartment_repo.clone(),
            notifications,
            chrono::Duration::seconds(0),
        ));

        let apartment = apartment_repo
            .create(Apartment::new(
                Uuid::new_v4(),
                "Ikeja".to_string(),
                700.0,
                ApartmentCategory::Studio,
                "GRA studio".to_string(),
                vec![],
            ))
            .await
            .unwrap();
        let user = Principal::User(User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
        ));
        service
            .create(
                &user,
                apartment.id,
                None,
                700.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap();

        let worker = SettlementWorker::new(service.clone(), Duration::from_millis(10));
        let handle = tokio::spawn(worker.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        let all = service.list_mine(&user).await.unwrap();
        assert_eq!(
            all[0].status,
            crate::domain::entities::PaymentStatus::Completed
        );
    }
}
