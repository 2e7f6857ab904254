//! Mock implementation of AnalyticsRepository for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{AnalyticsPeriod, AnalyticsSnapshot};
use crate::errors::DomainError;

use super::trait_::AnalyticsRepository;

/// In-memory analytics repository keyed by (date, period)
#[derive(Clone, Default)]
pub struct MockAnalyticsRepository {
    snapshots: Arc<RwLock<HashMap<(NaiveDate, AnalyticsPeriod), AnalyticsSnapshot>>>,
}

impl MockAnalyticsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalyticsRepository for MockAnalyticsRepository {
    async fn upsert(
        &self,
        snapshot: AnalyticsSnapshot,
    ) -> Result<AnalyticsSnapshot, DomainError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert((snapshot.date, snapshot.period), snapshot.clone());
        Ok(snapshot)
    }

    async fn find_by_date_and_period(
        &self,
        date: NaiveDate,
        period: AnalyticsPeriod,
    ) -> Result<Option<AnalyticsSnapshot>, DomainError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(&(date, period)).cloned())
    }

    async fn find_range(
        &self,
        period: AnalyticsPeriod,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSnapshot>, DomainError> {
        let snapshots = self.snapshots.read().await;
        let mut matched: Vec<AnalyticsSnapshot> = snapshots
            .values()
            .filter(|s| s.period == period && s.date >= from && s.date <= to)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(matched)
    }

    async fn latest(
        &self,
        period: AnalyticsPeriod,
    ) -> Result<Option<AnalyticsSnapshot>, DomainError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .values()
            .filter(|s| s.period == period)
            .max_by_key(|s| s.date)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Breakdown, Metrics};

    #[tokio::test]
    async fn test_upsert_replaces_same_slot() {
        let repo = MockAnalyticsRepository::new();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        let mut metrics = Metrics::default();
        metrics.total_users = 5;
        repo.upsert(AnalyticsSnapshot::new(
            date,
            AnalyticsPeriod::Daily,
            metrics,
            Breakdown::default(),
        ))
        .await
        .unwrap();

        let mut metrics = Metrics::default();
        metrics.total_users = 9;
        repo.upsert(AnalyticsSnapshot::new(
            date,
            AnalyticsPeriod::Daily,
            metrics,
            Breakdown::default(),
        ))
        .await
        .unwrap();

        let stored = repo
            .find_by_date_and_period(date, AnalyticsPeriod::Daily)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.metrics.total_users, 9);
    }
}
