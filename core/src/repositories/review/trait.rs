//! Review repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Review;
use crate::errors::DomainError;

/// Persistence contract for [`Review`] records
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError>;

    async fn create(&self, review: Review) -> Result<Review, DomainError>;

    async fn update(&self, review: Review) -> Result<Review, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Reviews for one apartment, newest first
    async fn find_by_apartment(&self, apartment_id: Uuid) -> Result<Vec<Review>, DomainError>;

    /// Reviews written by one user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError>;

    /// The one review this user left on the apartment, if any
    async fn find_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Review>, DomainError>;

    /// Every rating currently on file for the apartment; feeds the
    /// aggregate recomputation
    async fn ratings_for_apartment(&self, apartment_id: Uuid) -> Result<Vec<u8>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Review>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
