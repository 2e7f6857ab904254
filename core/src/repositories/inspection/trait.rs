//! Inspection request repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{InspectionRequest, InspectionStatus};
use crate::errors::DomainError;

/// Persistence contract for [`InspectionRequest`] records
#[async_trait]
pub trait InspectionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InspectionRequest>, DomainError>;

    async fn create(&self, request: InspectionRequest)
        -> Result<InspectionRequest, DomainError>;

    async fn update(&self, request: InspectionRequest)
        -> Result<InspectionRequest, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Requests made by one user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<InspectionRequest>, DomainError>;

    /// The user's pending request for an apartment, if any
    async fn find_pending_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<InspectionRequest>, DomainError>;

    /// Requests addressed to one agent, newest first
    async fn find_by_agent(&self, agent_id: Uuid)
        -> Result<Vec<InspectionRequest>, DomainError>;

    async fn find_all(&self) -> Result<Vec<InspectionRequest>, DomainError>;

    async fn count_by_status(&self, status: InspectionStatus) -> Result<u64, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
