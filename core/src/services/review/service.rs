//! Reviews and the apartment rating aggregate.
//!
//! The denormalized `average_rating` / `total_reviews` pair on the
//! apartment is recomputed from a full re-read of the apartment's ratings
//! after every review mutation and written last-write-wins. Two concurrent
//! mutations can briefly publish a stale aggregate; the next mutation
//! converges it, and the review rows themselves stay correct throughout.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::review::{average_rating, rating_in_range};
use crate::domain::entities::{
    BookingStatus, NotificationPriority, NotificationType, Principal, Review,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{
    ApartmentRepository, BookingRepository, ReviewRepository,
};
use crate::services::auth::AuthService;
use crate::services::notification::NotificationService;

/// Review service
pub struct ReviewService {
    review_repo: Arc<dyn ReviewRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    notifications: Arc<NotificationService>,
}

impl ReviewService {
    pub fn new(
        review_repo: Arc<dyn ReviewRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            review_repo,
            apartment_repo,
            booking_repo,
            notifications,
        }
    }

    async fn recompute_aggregate(&self, apartment_id: Uuid) -> DomainResult<()> {
        let ratings = self.review_repo.ratings_for_apartment(apartment_id).await?;
        self.apartment_repo
            .set_rating(apartment_id, average_rating(&ratings), ratings.len() as u32)
            .await
    }

    async fn has_confirmed_stay(&self, user_id: Uuid, apartment_id: Uuid) -> DomainResult<bool> {
        let bookings = self.booking_repo.find_by_user(user_id).await?;
        Ok(bookings
            .iter()
            .any(|b| b.apartment_id == apartment_id && b.status == BookingStatus::Confirmed))
    }

    /// Leaves a review; requires a confirmed stay unless the caller is an
    /// admin, and at most one review per user and apartment
    pub async fn create(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
        rating: u8,
        comment: String,
    ) -> DomainResult<Review> {
        if !rating_in_range(rating) {
            return Err(DomainError::validation("Rating must be between 1 and 5"));
        }
        let apartment = self
            .apartment_repo
            .find_by_id(apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;

        let user_id = principal.id();
        if !principal.is_admin() && !self.has_confirmed_stay(user_id, apartment_id).await? {
            return Err(DomainError::forbidden(
                "You can only review apartments you have stayed in",
            ));
        }
        if self
            .review_repo
            .find_by_user_and_apartment(user_id, apartment_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "You have already reviewed this apartment",
            ));
        }

        let review = self
            .review_repo
            .create(Review::new(
                user_id,
                apartment_id,
                apartment.agent_id,
                rating,
                comment,
            ))
            .await?;
        self.recompute_aggregate(apartment_id).await?;
        info!(review_id = %review.id, apartment_id = %apartment_id, rating, "review created");
        self.notifications
            .notify_quietly(
                apartment.agent_id,
                NotificationType::Review,
                "New review",
                format!("{} received a {rating}-star review", apartment.location),
                NotificationPriority::Low,
                Some(("review", review.id)),
            )
            .await;
        Ok(review)
    }

    /// Edits the caller's own review
    pub async fn update(
        &self,
        principal: &Principal,
        review_id: Uuid,
        rating: Option<u8>,
        comment: Option<String>,
    ) -> DomainResult<Review> {
        let mut review = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review"))?;
        if !review.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden("You can only edit your own reviews"));
        }
        if let Some(rating) = rating {
            if !rating_in_range(rating) {
                return Err(DomainError::validation("Rating must be between 1 and 5"));
            }
            review.rating = rating;
        }
        if let Some(comment) = comment {
            review.comment = comment;
        }
        review.updated_at = chrono::Utc::now();
        let review = self.review_repo.update(review).await?;
        self.recompute_aggregate(review.apartment_id).await?;
        Ok(review)
    }

    /// Deletes a review; owner or admin. The aggregate returns to 0.0 / 0
    /// when the last review goes.
    pub async fn delete(&self, principal: &Principal, review_id: Uuid) -> DomainResult<()> {
        let review = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review"))?;
        if !principal.is_admin() && !review.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden(
                "You can only delete your own reviews",
            ));
        }
        self.review_repo.delete(review_id).await?;
        self.recompute_aggregate(review.apartment_id).await?;
        Ok(())
    }

    /// Public agent response on a review of one of their listings
    pub async fn respond(
        &self,
        principal: &Principal,
        review_id: Uuid,
        response: String,
    ) -> DomainResult<Review> {
        let agent_id = AuthService::require_approved_agent(principal)?;
        let mut review = self
            .review_repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review"))?;
        if review.agent_id != agent_id {
            return Err(DomainError::forbidden(
                "You can only respond to reviews of your own listings",
            ));
        }
        review.respond(response);
        self.review_repo.update(review).await
    }

    pub async fn list_by_apartment(&self, apartment_id: Uuid) -> DomainResult<Vec<Review>> {
        self.review_repo.find_by_apartment(apartment_id).await
    }

    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<Review>> {
        self.review_repo.find_by_user(principal.id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        Admin, Apartment, ApartmentCategory, Booking, User,
    };
    use crate::repositories::{
        MockApartmentRepository, MockBookingRepository, MockNotificationRepository,
        MockReviewRepository, MockUserRepository,
    };

    struct Fixture {
        service: ReviewService,
        apartment_repo: Arc<MockApartmentRepository>,
        booking_repo: Arc<MockBookingRepository>,
    }

    fn fixture() -> Fixture {
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let booking_repo = Arc::new(MockBookingRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        Fixture {
            service: ReviewService::new(
                Arc::new(MockReviewRepository::new()),
                apartment_repo.clone(),
                booking_repo.clone(),
                notifications,
            ),
            apartment_repo,
            booking_repo,
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

    async fn listed_apartment(repo: &MockApartmentRepository) -> Apartment {
        repo.create(Apartment::new(
            Uuid::new_v4(),
            "Ajah".to_string(),
            450.0,
            ApartmentCategory::Studio,
            "Cosy studio".to_string(),
            vec![],
        ))
        .await
        .unwrap()
    }

    async fn confirmed_stay(repo: &MockBookingRepository, user: &Principal, apartment: &Apartment) {
        let mut booking = Booking::new(user.id(), apartment.id);
        booking.confirm_paid();
        repo.create(booking).await.unwrap();
    }

    #[tokio::test]
    async fn test_review_requires_confirmed_stay() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter("ada");

        let err = fx
            .service
            .create(&user, apartment.id, 5, "Lovely".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        confirmed_stay(&fx.booking_repo, &user, &apartment).await;
        assert!(fx
            .service
            .create(&user, apartment.id, 5, "Lovely".to_string())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_admin_reviews_without_stay() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let admin = Principal::Admin(Admin::new(
            "Root".to_string(),
            "root@example.com".to_string(),
            "hash".to_string(),
        ));
        assert!(fx
            .service
            .create(&admin, apartment.id, 3, "Spot check".to_string())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_review_rejected() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter("ada");
        confirmed_stay(&fx.booking_repo, &user, &apartment).await;

        fx.service
            .create(&user, apartment.id, 4, "Nice".to_string())
            .await
            .unwrap();
        let err = fx
            .service
            .create(&user, apartment.id, 2, "Changed my mind".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_aggregate_tracks_mutations() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        let ada = renter("ada");
        let bisi = renter("bisi");
        confirmed_stay(&fx.booking_repo, &ada, &apartment).await;
        confirmed_stay(&fx.booking_repo, &bisi, &apartment).await;

        fx.service
            .create(&ada, apartment.id, 4, "Nice".to_string())
            .await
            .unwrap();
        let review = fx
            .service
            .create(&bisi, apartment.id, 5, "Great".to_string())
            .await
            .unwrap();

        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_rating, 4.5);
        assert_eq!(stored.total_reviews, 2);

        // Deleting one recomputes; deleting the last resets to zero
        fx.service.delete(&bisi, review.id).await.unwrap();
        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_rating, 4.0);
        assert_eq!(stored.total_reviews, 1);

        let remaining = fx.service.list_by_apartment(apartment.id).await.unwrap();
        fx.service.delete(&ada, remaining[0].id).await.unwrap();
        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_rating, 0.0);
        assert_eq!(stored.total_reviews, 0);
    }

    #[tokio::test]
    async fn test_rounding_to_one_decimal() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;

        for (name, rating) in [("a", 1), ("b", 2), ("c", 2)] {
            let user = renter(name);
            confirmed_stay(&fx.booking_repo, &user, &apartment).await;
            fx.service
                .create(&user, apartment.id, rating, "ok".to_string())
                .await
                .unwrap();
        }

        let stored = fx
            .apartment_repo
            .find_by_id(apartment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.average_rating, 1.7);
    }
}
