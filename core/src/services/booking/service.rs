//! Booking lifecycle and availability consistency.
//!
//! Admission control runs on the apartment row itself: a booking is only
//! created after `claim_availability` atomically flips the row from
//! available to unavailable. Concurrent attempts therefore race on that
//! single conditional update and exactly one wins; the losers see a
//! conflict without any state to undo.
//!
//! Cancellation releases availability unconditionally. With one active
//! booking per apartment the release is always correct, and a release on
//! an already-available row is a harmless no-op.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{
    Booking, BookingStatus, NotificationPriority, NotificationType, Principal,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{ApartmentRepository, BookingRepository};
use crate::services::auth::AuthService;
use crate::services::notification::NotificationService;

/// Booking lifecycle service
pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
    notifications: Arc<NotificationService>,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            booking_repo,
            apartment_repo,
            notifications,
        }
    }

    /// Creates a pending booking for the calling user.
    ///
    /// Order matters: the duplicate check runs first so a user re-booking
    /// the same apartment gets a clear error, then the availability claim
    /// decides the winner among concurrent strangers.
    pub async fn create(&self, principal: &Principal, apartment_id: Uuid) -> DomainResult<Booking> {
        let user_id = match principal {
            Principal::User(user) => user.id,
            _ => return Err(DomainError::forbidden("Only users can book apartments")),
        };

        let apartment = self
            .apartment_repo
            .find_by_id(apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;

        if self
            .booking_repo
            .find_active_by_user_and_apartment(user_id, apartment_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "You already have an active booking for this apartment",
            ));
        }

        if !self.apartment_repo.claim_availability(apartment_id).await? {
            return Err(DomainError::conflict(
                "Apartment is not available for booking",
            ));
        }

        let booking = match self.booking_repo.create(Booking::new(user_id, apartment_id)).await {
            Ok(booking) => booking,
            Err(e) => {
                // Give the slot back if the insert failed after we claimed it
                if let Err(release_err) =
                    self.apartment_repo.release_availability(apartment_id).await
                {
                    warn!(apartment_id = %apartment_id, error = %release_err,
                        "failed to release availability after booking insert failure");
                }
                return Err(e);
            }
        };

        info!(booking_id = %booking.id, apartment_id = %apartment_id, "booking created");
        self.notifications
            .notify_quietly(
                apartment.agent_id,
                NotificationType::Booking,
                "New booking request",
                format!("A new booking was requested for {}", apartment.location),
                NotificationPriority::Medium,
                Some(("booking", booking.id)),
            )
            .await;
        Ok(booking)
    }

    /// Cancels (deletes) the caller's booking and reopens the apartment.
    ///
    /// The availability release is unconditional regardless of booking
    /// status; see the module docs.
    pub async fn cancel(&self, principal: &Principal, booking_id: Uuid) -> DomainResult<()> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking"))?;

        if !principal.is_admin() && !booking.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden(
                "You can only cancel your own bookings",
            ));
        }

        self.booking_repo.delete(booking_id).await?;
        self.apartment_repo
            .release_availability(booking.apartment_id)
            .await?;
        info!(booking_id = %booking_id, "booking cancelled, availability released");
        Ok(())
    }

    /// Applies an agent decision to a booking on one of their listings.
    /// Rejection and cancellation reopen the apartment; approval keeps the
    /// slot held.
    pub async fn decide(
        &self,
        principal: &Principal,
        booking_id: Uuid,
        decision: BookingStatus,
    ) -> DomainResult<Booking> {
        if !matches!(
            decision,
            BookingStatus::Approved | BookingStatus::Rejected | BookingStatus::Cancelled
        ) {
            return Err(DomainError::validation(
                "Decision must be approved, rejected, or cancelled",
            ));
        }

        let mut booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking"))?;
        let apartment = self
            .apartment_repo
            .find_by_id(booking.apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;

        if !principal.is_admin() {
            let agent_id = AuthService::require_approved_agent(principal)?;
            if !apartment.is_owned_by(agent_id) {
                return Err(DomainError::forbidden(
                    "You can only manage bookings on your own listings",
                ));
            }
        }

        booking.set_status(decision);
        let booking = self.booking_repo.update(booking).await?;

        if matches!(decision, BookingStatus::Rejected | BookingStatus::Cancelled) {
            self.apartment_repo
                .release_availability(booking.apartment_id)
                .await?;
        }

        info!(booking_id = %booking_id, decision = decision.as_str(), "booking decision applied");
        self.notifications
            .notify_quietly(
                booking.user_id,
                NotificationType::Booking,
                format!("Booking {}", decision.as_str()),
                format!(
                    "Your booking for {} was {}",
                    apartment.location,
                    decision.as_str()
                ),
                NotificationPriority::Medium,
                Some(("booking", booking.id)),
            )
            .await;
        Ok(booking)
    }

    /// Admin removal of any booking. Availability is only released when
    /// the deleted booking was still holding the slot.
    pub async fn admin_delete(&self, principal: &Principal, booking_id: Uuid) -> DomainResult<()> {
        AuthService::require_admin(principal)?;
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking"))?;

        self.booking_repo.delete(booking_id).await?;
        if booking.status == BookingStatus::Approved {
            self.apartment_repo
                .release_availability(booking.apartment_id)
                .await?;
        }
        info!(booking_id = %booking_id, "booking removed by admin");
        Ok(())
    }

    pub async fn get(&self, principal: &Principal, booking_id: Uuid) -> DomainResult<Booking> {
        let booking = self
            .booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking"))?;
        if principal.is_admin() || booking.is_owned_by(principal.id()) {
            return Ok(booking);
        }
        if let Some(agent) = principal.as_agent() {
            let apartment = self
                .apartment_repo
                .find_by_id(booking.apartment_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Apartment"))?;
            if apartment.is_owned_by(agent.id) {
                return Ok(booking);
            }
        }
        Err(DomainError::forbidden("Not your booking"))
    }

    /// The calling user's bookings, newest first
    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<Booking>> {
        self.booking_repo.find_by_user(principal.id()).await
    }

    /// Bookings against the calling agent's listings
    pub async fn list_for_agent(&self, principal: &Principal) -> DomainResult<Vec<Booking>> {
        let agent_id = AuthService::require_approved_agent(principal)?;
        let apartment_ids: Vec<Uuid> = self
            .apartment_repo
            .find_by_agent(agent_id)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        self.booking_repo.find_by_apartments(&apartment_ids).await
    }

    pub async fn list_all(&self, principal: &Principal) -> DomainResult<Vec<Booking>> {
        AuthService::require_admin(principal)?;
        self.booking_repo.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Agent, AgentStatus, Apartment, ApartmentCategory, User,
    };
    use crate::repositories::{
        MockApartmentRepository, MockBookingRepository, MockNotificationRepository,
        MockUserRepository,
    };

    struct Fixture {
        service: BookingService,
        apartment_repo: Arc<MockApartmentRepository>,
    }

    fn fixture() -> Fixture {
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        let service = BookingService::new(
            Arc::new(MockBookingRepository::new()),
            apartment_repo.clone(),
            notifications,
        );
        Fixture {
            service,
            apartment_repo,
        }
    }

    fn renter(name: &str) -> Principal {
        Principal::User(User::new(
            name.to_string(),
            format!("{name}@example.com"),
            "hash".to_string(),
            "0800".to_string(),
        ))
    }

    fn owner_of(apartment: &Apartment) -> Principal {
        let mut agent = Agent::new(
            "Owner".to_string(),
            "owner@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
            None,
        );
        agent.id = apartment.agent_id;
        agent.set_status(AgentStatus::Approved);
        Principal::Agent(agent)
    }

    async fn listed_apartment(repo: &MockApartmentRepository) -> Apartment {
        repo.create(Apartment::new(
            Uuid::new_v4(),
            "Surulere".to_string(),
            650.0,
            ApartmentCategory::OneBedroom,
            "One bedroom near the stadium".to_string(),
            vec![],
        ))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_booking_flips_availability() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter("ada");

        fx.service.create(&user, apartment.id).await.unwrap();
        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.availability);
    }

    #[tokio::test]
    async fn test_second_booker_gets_conflict() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        fx.service.create(&renter("ada"), apartment.id).await.unwrap();
        let err = fx
            .service
            .create(&renter("bisi"), apartment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_booking_by_same_user_rejected() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter("ada");

        let booking = fx.service.create(&user, apartment.id).await.unwrap();
        let err = fx.service.create(&user, apartment.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        // After cancelling their booking the user can book again
        fx.service.cancel(&user, booking.id).await.unwrap();
        assert!(fx.service.create(&user, apartment.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_releases_availability() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter("ada");

        let booking = fx.service.create(&user, apartment.id).await.unwrap();
        fx.service.cancel(&user, booking.id).await.unwrap();

        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.availability);
    }

    #[tokio::test]
    async fn test_cancel_requires_ownership() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        let booking = fx.service.create(&renter("ada"), apartment.id).await.unwrap();
        let err = fx
            .service
            .cancel(&renter("bisi"), booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_rejection_reopens_apartment() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let agent = owner_of(&apartment);

        let booking = fx.service.create(&renter("ada"), apartment.id).await.unwrap();
        fx.service
            .decide(&agent, booking.id, BookingStatus::Rejected)
            .await
            .unwrap();

        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.availability);
    }

    #[tokio::test]
    async fn test_approval_keeps_slot_held() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let agent = owner_of(&apartment);

        let booking = fx.service.create(&renter("ada"), apartment.id).await.unwrap();
        let approved = fx
            .service
            .decide(&agent, booking.id, BookingStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);

        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.availability);
    }

    #[tokio::test]
    async fn test_decision_rejects_foreign_agent() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        let booking = fx.service.create(&renter("ada"), apartment.id).await.unwrap();

        let mut stranger = Agent::new(
            "Stranger".to_string(),
            "stranger@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
            None,
        );
        stranger.set_status(AgentStatus::Approved);
        let err = fx
            .service
            .decide(
                &Principal::Agent(stranger),
                booking.id,
                BookingStatus::Approved,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_bookings_one_winner() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let service = Arc::new(fx.service);

        let mut handles = Vec::new();
        for i in 0..6 {
            let service = service.clone();
            let principal = renter(&format!("user{i}"));
            let apartment_id = apartment.id;
            handles.push(tokio::spawn(async move {
                service.create(&principal, apartment_id).await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }
}
