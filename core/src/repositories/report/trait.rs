//! Report repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Report, ReportStatus};
use crate::errors::DomainError;

/// Persistence contract for [`Report`] records
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>, DomainError>;

    async fn create(&self, report: Report) -> Result<Report, DomainError>;

    async fn update(&self, report: Report) -> Result<Report, DomainError>;

    /// Reports filed by one user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Report>, DomainError>;

    /// Reports against one apartment, newest first
    async fn find_by_apartment(&self, apartment_id: Uuid) -> Result<Vec<Report>, DomainError>;

    /// An unresolved report by this user on this apartment created at or
    /// after `since`; backs the duplicate-report window
    async fn find_recent_open(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<Report>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Report>, DomainError>;

    async fn count_by_status(&self, status: ReportStatus) -> Result<u64, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
