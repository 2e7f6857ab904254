//! Favorite repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Favorite;
use crate::errors::DomainError;

/// Persistence contract for [`Favorite`] records; at most one row exists
/// per (user, apartment) pair
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Favorite>, DomainError>;

    async fn create(&self, favorite: Favorite) -> Result<Favorite, DomainError>;

    async fn update(&self, favorite: Favorite) -> Result<Favorite, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// One user's favorites, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Favorite>, DomainError>;

    async fn find_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Favorite>, DomainError>;

    /// Removes the pair row; `true` when one existed
    async fn delete_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<bool, DomainError>;
}
