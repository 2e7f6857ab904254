//! Payment lifecycle: creation, settlement, and refunds.
//!
//! A payment is stored pending with a `settle_after` instant instead of
//! being completed by an in-process timer. The settlement pass picks up
//! every due pending payment and applies a conditional pending->completed
//! transition, so a crash between creation and settlement loses nothing
//! and re-running a pass never double-settles.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{
    NotificationPriority, NotificationType, Payment, PaymentMethod, PaymentStatus, Principal,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{ApartmentRepository, BookingRepository, PaymentRepository};
use crate::services::auth::AuthService;
use crate::services::notification::NotificationService;

/// Most due payments settled in one pass
const SETTLEMENT_BATCH: u32 = 100;

/// Payment service
pub struct PaymentService {
    payment_repo: Arc<dyn PaymentRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
    notifications: Arc<NotificationService>,
    settle_delay: Duration,
}

/// Builds a gateway-style transaction id from the current time and a
/// random suffix
fn transaction_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
    format!("TXN{millis}{suffix}")
}

impl PaymentService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
        notifications: Arc<NotificationService>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            payment_repo,
            booking_repo,
            apartment_repo,
            notifications,
            settle_delay,
        }
    }

    /// Records a pending payment by the calling user
    pub async fn create(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
        booking_id: Option<Uuid>,
        amount: f64,
        method: PaymentMethod,
        currency: String,
    ) -> DomainResult<Payment> {
        let user_id = match principal {
            Principal::User(user) => user.id,
            _ => return Err(DomainError::forbidden("Only users can make payments")),
        };
        if amount <= 0.0 {
            return Err(DomainError::validation("Amount must be greater than zero"));
        }
        self.apartment_repo
            .find_by_id(apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;

        if let Some(booking_id) = booking_id {
            let booking = self
                .booking_repo
                .find_by_id(booking_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Booking"))?;
            if !booking.is_owned_by(user_id) {
                return Err(DomainError::forbidden(
                    "You can only pay for your own bookings",
                ));
            }
            let prior = self.payment_repo.find_by_booking(booking_id).await?;
            if prior.iter().any(|p| p.status == PaymentStatus::Completed) {
                return Err(DomainError::conflict(
                    "This booking already has a completed payment",
                ));
            }
        }

        let payment = self
            .payment_repo
            .create(Payment::new(
                user_id,
                apartment_id,
                booking_id,
                amount,
                method,
                currency,
                transaction_id(),
                self.settle_delay,
            ))
            .await?;
        info!(payment_id = %payment.id, txn = %payment.transaction_id, "payment created");
        Ok(payment)
    }

    /// One settlement pass: completes every due pending payment and
    /// confirms its booking. Returns how many payments settled.
    ///
    /// Safe to call from multiple places; the conditional transition makes
    /// each payment settle at most once.
    pub async fn settle_due(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let due = self.payment_repo.find_due_pending(now, SETTLEMENT_BATCH).await?;
        let mut settled = 0;
        for payment in due {
            let Some(payment) = self.payment_repo.mark_completed_if_pending(payment.id).await?
            else {
                // Another pass got there first
                continue;
            };
            settled += 1;

            if let Some(booking_id) = payment.booking_id {
                match self.booking_repo.find_by_id(booking_id).await? {
                    Some(mut booking) => {
                        booking.confirm_paid();
                        self.booking_repo.update(booking).await?;
                    }
                    None => {
                        warn!(payment_id = %payment.id, booking_id = %booking_id,
                            "settled payment references a missing booking");
                    }
                }
            }

            info!(payment_id = %payment.id, txn = %payment.transaction_id, "payment settled");
            self.notifications
                .notify_quietly(
                    payment.user_id,
                    NotificationType::Payment,
                    "Payment completed",
                    format!(
                        "Your payment {} of {} {} was completed",
                        payment.transaction_id, payment.amount, payment.currency
                    ),
                    NotificationPriority::Medium,
                    Some(("payment", payment.id)),
                )
                .await;
        }
        Ok(settled)
    }

    /// Requests a refund on the caller's completed payment; allowed once,
    /// within the refund window
    pub async fn request_refund(
        &self,
        principal: &Principal,
        payment_id: Uuid,
        reason: Option<String>,
    ) -> DomainResult<Payment> {
        let mut payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment"))?;
        if !payment.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden(
                "You can only request refunds on your own payments",
            ));
        }
        if payment.refund_requested {
            return Err(DomainError::conflict(
                "A refund has already been requested for this payment",
            ));
        }
        if payment.status != PaymentStatus::Completed {
            return Err(DomainError::conflict(
                "Only completed payments can be refunded",
            ));
        }
        if !payment.refund_window_open(Utc::now()) {
            return Err(DomainError::validation("The refund window has closed"));
        }

        payment.request_refund(reason);
        let payment = self.payment_repo.update(payment).await?;
        info!(payment_id = %payment.id, "refund requested");
        Ok(payment)
    }

    /// Admin decision on a pending refund. Approval refunds the payment,
    /// cancels the booking, and reopens the apartment; rejection reverts
    /// the payment to completed.
    pub async fn decide_refund(
        &self,
        principal: &Principal,
        payment_id: Uuid,
        approve: bool,
    ) -> DomainResult<Payment> {
        AuthService::require_admin(principal)?;
        let mut payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment"))?;
        if payment.status != PaymentStatus::RefundPending {
            return Err(DomainError::conflict(
                "No pending refund request on this payment",
            ));
        }

        if approve {
            payment.approve_refund();
        } else {
            payment.reject_refund();
        }
        let payment = self.payment_repo.update(payment).await?;

        if approve {
            if let Some(booking_id) = payment.booking_id {
                if let Some(mut booking) = self.booking_repo.find_by_id(booking_id).await? {
                    booking.cancel_refunded();
                    self.booking_repo.update(booking).await?;
                }
            }
            self.apartment_repo
                .release_availability(payment.apartment_id)
                .await?;
        }

        let outcome = if approve { "approved" } else { "rejected" };
        info!(payment_id = %payment.id, outcome, "refund decision applied");
        self.notifications
            .notify_quietly(
                payment.user_id,
                NotificationType::Payment,
                format!("Refund {outcome}"),
                format!(
                    "Your refund request for {} was {outcome}",
                    payment.transaction_id
                ),
                NotificationPriority::High,
                Some(("payment", payment.id)),
            )
            .await;
        Ok(payment)
    }

    pub async fn get(&self, principal: &Principal, payment_id: Uuid) -> DomainResult<Payment> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment"))?;
        if principal.is_admin() || payment.is_owned_by(principal.id()) {
            Ok(payment)
        } else {
            Err(DomainError::forbidden("Not your payment"))
        }
    }

    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<Payment>> {
        self.payment_repo.find_by_user(principal.id()).await
    }

    pub async fn list_all(&self, principal: &Principal) -> DomainResult<Vec<Payment>> {
        AuthService::require_admin(principal)?;
        self.payment_repo.find_all().await
    }

    /// The admin refund queue, oldest request first
    pub async fn refund_queue(&self, principal: &Principal) -> DomainResult<Vec<Payment>> {
        AuthService::require_admin(principal)?;
        self.payment_repo.find_refund_pending().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Admin, Apartment, ApartmentCategory, Booking, BookingStatus, User,
    };
    use crate::repositories::{
        MockApartmentRepository, MockBookingRepository, MockNotificationRepository,
        MockPaymentRepository, MockUserRepository,
    };

    struct Fixture {
        service: PaymentService,
        booking_repo: Arc<MockBookingRepository>,
        apartment_repo: Arc<MockApartmentRepository>,
    }

    fn fixture(settle_delay: Duration) -> Fixture {
        let payment_repo = Arc::new(MockPaymentRepository::new());
        let booking_repo = Arc::new(MockBookingRepository::new());
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        let service = PaymentService::new(
            payment_repo,
            booking_repo.clone(),
            apartment_repo.clone(),
            notifications,
            settle_delay,
        );
        Fixture {
            service,
            booking_repo,
            apartment_repo,
        }
    }

    fn renter() -> Principal {
        Principal::User(User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
        ))
    }

    fn admin() -> Principal {
        Principal::Admin(Admin::new(
            "Root".to_string(),
            "root@example.com".to_string(),
            "hash".to_string(),
        ))
    }

    async fn listed_apartment(repo: &MockApartmentRepository) -> Apartment {
        repo.create(Apartment::new(
            Uuid::new_v4(),
            "Ikoyi".to_string(),
            2200.0,
            ApartmentCategory::Duplex,
            "Waterfront duplex".to_string(),
            vec![],
        ))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_settlement_confirms_booking() {
        let fx = fixture(Duration::seconds(0));
        let user = renter();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let booking = fx
            .booking_repo
            .create(Booking::new(user.id(), apartment.id))
            .await
            .unwrap();

        fx.service
            .create(
                &user,
                apartment.id,
                Some(booking.id),
                2200.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap();

        let settled = fx.service.settle_due(Utc::now()).await.unwrap();
        assert_eq!(settled, 1);

        let booking = fx
            .booking_repo
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);

        // Re-running the pass settles nothing new
        assert_eq!(fx.service.settle_due(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_settlement_waits_for_settle_after() {
        let fx = fixture(Duration::minutes(5));
        let user = renter();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        fx.service
            .create(
                &user,
                apartment.id,
                None,
                500.0,
                PaymentMethod::Cash,
                "USD".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(fx.service.settle_due(Utc::now()).await.unwrap(), 0);
        assert_eq!(
            fx.service
                .settle_due(Utc::now() + Duration::minutes(6))
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_paid_booking_rejects_second_payment() {
        let fx = fixture(Duration::seconds(0));
        let user = renter();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let booking = fx
            .booking_repo
            .create(Booking::new(user.id(), apartment.id))
            .await
            .unwrap();

        fx.service
            .create(
                &user,
                apartment.id,
                Some(booking.id),
                2200.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap();
        fx.service.settle_due(Utc::now()).await.unwrap();

        let err = fx
            .service
            .create(
                &user,
                apartment.id,
                Some(booking.id),
                2200.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_refund_flow_reopens_apartment() {
        let fx = fixture(Duration::seconds(0));
        let user = renter();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        assert!(fx.apartment_repo.claim_availability(apartment.id).await.unwrap());
        let booking = fx
            .booking_repo
            .create(Booking::new(user.id(), apartment.id))
            .await
            .unwrap();

        let payment = fx
            .service
            .create(
                &user,
                apartment.id,
                Some(booking.id),
                2200.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap();
        fx.service.settle_due(Utc::now()).await.unwrap();

        fx.service
            .request_refund(&user, payment.id, Some("Plans changed".to_string()))
            .await
            .unwrap();
        let refunded = fx
            .service
            .decide_refund(&admin(), payment.id, true)
            .await
            .unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        let booking = fx
            .booking_repo
            .find_by_id(booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);

        let apartment = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(apartment.availability);
    }

    #[tokio::test]
    async fn test_second_refund_request_rejected() {
        let fx = fixture(Duration::seconds(0));
        let user = renter();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        let payment = fx
            .service
            .create(
                &user,
                apartment.id,
                None,
                900.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap();
        fx.service.settle_due(Utc::now()).await.unwrap();

        fx.service.request_refund(&user, payment.id, None).await.unwrap();
        let err = fx
            .service
            .request_refund(&user, payment.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        // Rejection reverts to completed, but the one-shot flag is cleared
        // by reject_refund, so status gates the next request
        fx.service
            .decide_refund(&admin(), payment.id, false)
            .await
            .unwrap();
        assert!(fx.service.request_refund(&user, payment.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_pending_payment_not_refundable() {
        let fx = fixture(Duration::minutes(5));
        let user = renter();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        let payment = fx
            .service
            .create(
                &user,
                apartment.id,
                None,
                900.0,
                PaymentMethod::Card,
                "USD".to_string(),
            )
            .await
            .unwrap();

        let err = fx
            .service
            .request_refund(&user, payment.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }
}
