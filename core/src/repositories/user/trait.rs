//! User repository trait defining the interface for user persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::errors::DomainError;

/// Persistence contract for [`User`] accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Emails are unique across user accounts
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn create(&self, user: User) -> Result<User, DomainError>;

    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Returns `true` when a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// All users, newest first; used by the admin console
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
