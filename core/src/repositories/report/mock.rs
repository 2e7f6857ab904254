//! Mock implementation of ReportRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Report, ReportStatus};
use crate::errors::DomainError;

use super::trait_::ReportRepository;

/// In-memory report repository
#[derive(Clone, Default)]
pub struct MockReportRepository {
    reports: Arc<RwLock<HashMap<Uuid, Report>>>,
}

impl MockReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for MockReportRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>, DomainError> {
        let reports = self.reports.read().await;
        Ok(reports.get(&id).cloned())
    }

    async fn create(&self, report: Report) -> Result<Report, DomainError> {
        let mut reports = self.reports.write().await;
        reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn update(&self, report: Report) -> Result<Report, DomainError> {
        let mut reports = self.reports.write().await;
        if !reports.contains_key(&report.id) {
            return Err(DomainError::not_found("Report"));
        }
        reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.read().await;
        let mut mine: Vec<Report> = reports
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(mine)
    }

    async fn find_by_apartment(&self, apartment_id: Uuid) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.read().await;
        let mut matched: Vec<Report> = reports
            .values()
            .filter(|r| r.apartment_id == apartment_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn find_recent_open(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<Report>, DomainError> {
        let reports = self.reports.read().await;
        Ok(reports
            .values()
            .find(|r| {
                r.user_id == user_id
                    && r.apartment_id == apartment_id
                    && r.created_at >= since
                    && !matches!(r.status, ReportStatus::Resolved | ReportStatus::Closed)
            })
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.read().await;
        let mut all: Vec<Report> = reports.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn count_by_status(&self, status: ReportStatus) -> Result<u64, DomainError> {
        let reports = self.reports.read().await;
        Ok(reports.values().filter(|r| r.status == status).count() as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let reports = self.reports.read().await;
        Ok(reports.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ReportType;
    use chrono::Duration;

    #[tokio::test]
    async fn test_recent_open_ignores_resolved() {
        let repo = MockReportRepository::new();
        let user = Uuid::new_v4();
        let apartment = Uuid::new_v4();

        let mut report = Report::new(user, apartment, "Leak".to_string(), ReportType::Condition);
        report.resolve(None);
        repo.create(report).await.unwrap();

        let since = Utc::now() - Duration::hours(24);
        assert!(repo
            .find_recent_open(user, apartment, since)
            .await
            .unwrap()
            .is_none());

        repo.create(Report::new(
            user,
            apartment,
            "Leak again".to_string(),
            ReportType::Condition,
        ))
        .await
        .unwrap();
        assert!(repo
            .find_recent_open(user, apartment, since)
            .await
            .unwrap()
            .is_some());
    }
}
