//! Analytics snapshot repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{AnalyticsPeriod, AnalyticsSnapshot};
use crate::errors::DomainError;

/// Persistence contract for [`AnalyticsSnapshot`] records, keyed by
/// (date, period)
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Inserts or replaces the snapshot for its (date, period) slot, so
    /// re-collecting the same slot is idempotent
    async fn upsert(&self, snapshot: AnalyticsSnapshot)
        -> Result<AnalyticsSnapshot, DomainError>;

    async fn find_by_date_and_period(
        &self,
        date: NaiveDate,
        period: AnalyticsPeriod,
    ) -> Result<Option<AnalyticsSnapshot>, DomainError>;

    /// Snapshots of one period within `[from, to]`, oldest first
    async fn find_range(
        &self,
        period: AnalyticsPeriod,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSnapshot>, DomainError>;

    /// Most recent snapshot of the given period
    async fn latest(
        &self,
        period: AnalyticsPeriod,
    ) -> Result<Option<AnalyticsSnapshot>, DomainError>;
}
