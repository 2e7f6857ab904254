//! Admin repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Admin;
use crate::errors::DomainError;

/// Persistence contract for [`Admin`] accounts
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError>;

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError>;
}
