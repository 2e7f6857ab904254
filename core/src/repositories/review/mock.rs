//! Mock implementation of ReviewRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Review;
use crate::errors::DomainError;

use super::trait_::ReviewRepository;

/// In-memory review repository
#[derive(Clone, Default)]
pub struct MockReviewRepository {
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl MockReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for MockReviewRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        let reviews = self.reviews.read().await;
        Ok(reviews.get(&id).cloned())
    }

    async fn create(&self, review: Review) -> Result<Review, DomainError> {
        let mut reviews = self.reviews.write().await;
        if reviews
            .values()
            .any(|r| r.user_id == review.user_id && r.apartment_id == review.apartment_id)
        {
            return Err(DomainError::conflict(
                "You have already reviewed this apartment",
            ));
        }
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn update(&self, review: Review) -> Result<Review, DomainError> {
        let mut reviews = self.reviews.write().await;
        if !reviews.contains_key(&review.id) {
            return Err(DomainError::not_found("Review"));
        }
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.remove(&id).is_some())
    }

    async fn find_by_apartment(&self, apartment_id: Uuid) -> Result<Vec<Review>, DomainError> {
        let reviews = self.reviews.read().await;
        let mut matched: Vec<Review> = reviews
            .values()
            .filter(|r| r.apartment_id == apartment_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError> {
        let reviews = self.reviews.read().await;
        let mut mine: Vec<Review> = reviews
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Review>, DomainError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .find(|r| r.user_id == user_id && r.apartment_id == apartment_id)
            .cloned())
    }

    async fn ratings_for_apartment(&self, apartment_id: Uuid) -> Result<Vec<u8>, DomainError> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .filter(|r| r.apartment_id == apartment_id)
            .map(|r| r.rating)
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Review>, DomainError> {
        let reviews = self.reviews.read().await;
        let mut all: Vec<Review> = reviews.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let reviews = self.reviews.read().await;
        Ok(reviews.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_one_review_per_user_and_apartment() {
        let repo = MockReviewRepository::new();
        let user = Uuid::new_v4();
        let apartment = Uuid::new_v4();
        let agent = Uuid::new_v4();

        repo.create(Review::new(user, apartment, agent, 5, "Great".to_string()))
            .await
            .unwrap();
        let err = repo
            .create(Review::new(user, apartment, agent, 1, "Again".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }
}
