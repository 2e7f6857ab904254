//! Complaint reports against listings.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{
    NotificationPriority, NotificationType, Principal, Report, ReportType,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{AgentRepository, ApartmentRepository, ReportRepository};
use crate::services::auth::AuthService;
use crate::services::notification::NotificationService;

/// Hours during which a second open report on the same apartment by the
/// same user counts as a duplicate
pub const DUPLICATE_WINDOW_HOURS: i64 = 24;

/// Report handling service
pub struct ReportService {
    report_repo: Arc<dyn ReportRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
    agent_repo: Arc<dyn AgentRepository>,
    notifications: Arc<NotificationService>,
}

impl ReportService {
    pub fn new(
        report_repo: Arc<dyn ReportRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
        agent_repo: Arc<dyn AgentRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            report_repo,
            apartment_repo,
            agent_repo,
            notifications,
        }
    }

    /// Files a report; rejected when the caller already has an unresolved
    /// report on the apartment from the last 24 hours
    pub async fn create(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
        message: String,
        report_type: ReportType,
    ) -> DomainResult<Report> {
        let user_id = match principal {
            Principal::User(user) => user.id,
            _ => return Err(DomainError::forbidden("Only users can file reports")),
        };
        if message.trim().is_empty() {
            return Err(DomainError::validation("Report message is required"));
        }
        let apartment = self
            .apartment_repo
            .find_by_id(apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;

        let since = Utc::now() - Duration::hours(DUPLICATE_WINDOW_HOURS);
        if self
            .report_repo
            .find_recent_open(user_id, apartment_id, since)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "You already have an open report for this apartment",
            ));
        }

        let report = self
            .report_repo
            .create(Report::new(user_id, apartment_id, message, report_type))
            .await?;
        info!(report_id = %report.id, kind = report_type.as_str(),
            priority = report.priority.as_str(), "report filed");
        self.notifications
            .notify_quietly(
                apartment.agent_id,
                NotificationType::Report,
                "New report on your listing",
                format!("A {} report was filed against {}", report_type.as_str(), apartment.location),
                NotificationPriority::High,
                Some(("report", report.id)),
            )
            .await;
        Ok(report)
    }

    async fn load(&self, id: Uuid) -> DomainResult<Report> {
        self.report_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Report"))
    }

    /// Agent response; the owning agent of the reported listing only
    pub async fn respond(
        &self,
        principal: &Principal,
        report_id: Uuid,
        response: String,
    ) -> DomainResult<Report> {
        let agent_id = AuthService::require_approved_agent(principal)?;
        let mut report = self.load(report_id).await?;
        let apartment = self
            .apartment_repo
            .find_by_id(report.apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;
        if !apartment.is_owned_by(agent_id) && report.assigned_agent_id != Some(agent_id) {
            return Err(DomainError::forbidden(
                "You can only respond to reports on your own listings",
            ));
        }
        report.respond(response);
        let report = self.report_repo.update(report).await?;
        self.notifications
            .notify_quietly(
                report.user_id,
                NotificationType::Report,
                "Response to your report",
                "The agent responded to your report".to_string(),
                NotificationPriority::Medium,
                Some(("report", report.id)),
            )
            .await;
        Ok(report)
    }

    /// Resolution by an admin, or by the agent handling the report
    pub async fn resolve(
        &self,
        principal: &Principal,
        report_id: Uuid,
        notes: Option<String>,
    ) -> DomainResult<Report> {
        let mut report = self.load(report_id).await?;
        if !principal.is_admin() {
            let agent_id = AuthService::require_approved_agent(principal)?;
            let apartment = self
                .apartment_repo
                .find_by_id(report.apartment_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Apartment"))?;
            if !apartment.is_owned_by(agent_id) && report.assigned_agent_id != Some(agent_id) {
                return Err(DomainError::forbidden(
                    "You can only resolve reports on your own listings",
                ));
            }
        }
        report.resolve(notes);
        let report = self.report_repo.update(report).await?;
        self.notifications
            .notify_quietly(
                report.user_id,
                NotificationType::Report,
                "Report resolved",
                "Your report has been resolved".to_string(),
                NotificationPriority::Medium,
                Some(("report", report.id)),
            )
            .await;
        Ok(report)
    }

    /// Admin assignment of a report to an agent for handling
    pub async fn assign(
        &self,
        principal: &Principal,
        report_id: Uuid,
        agent_id: Uuid,
    ) -> DomainResult<Report> {
        AuthService::require_admin(principal)?;
        let mut report = self.load(report_id).await?;
        self.agent_repo
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Agent"))?;
        report.assign(agent_id);
        let report = self.report_repo.update(report).await?;
        self.notifications
            .notify_quietly(
                agent_id,
                NotificationType::Report,
                "Report assigned to you",
                "An admin assigned a report to you for handling".to_string(),
                NotificationPriority::High,
                Some(("report", report.id)),
            )
            .await;
        Ok(report)
    }

    /// Escalation by the reporting user or an admin; raises priority to
    /// high
    pub async fn escalate(
        &self,
        principal: &Principal,
        report_id: Uuid,
        notes: Option<String>,
    ) -> DomainResult<Report> {
        let mut report = self.load(report_id).await?;
        if !principal.is_admin() && !report.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden(
                "You can only escalate your own reports",
            ));
        }
        if report.escalated {
            return Err(DomainError::conflict("Report is already escalated"));
        }
        report.escalate(notes);
        self.report_repo.update(report).await
    }

    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<Report>> {
        self.report_repo.find_by_user(principal.id()).await
    }

    /// Reports against one listing; the owner agent or an admin
    pub async fn list_for_apartment(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
    ) -> DomainResult<Vec<Report>> {
        if !principal.is_admin() {
            let agent_id = AuthService::require_approved_agent(principal)?;
            let apartment = self
                .apartment_repo
                .find_by_id(apartment_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Apartment"))?;
            if !apartment.is_owned_by(agent_id) {
                return Err(DomainError::forbidden(
                    "You can only view reports on your own listings",
                ));
            }
        }
        self.report_repo.find_by_apartment(apartment_id).await
    }

    pub async fn list_all(&self, principal: &Principal) -> DomainResult<Vec<Report>> {
        AuthService::require_admin(principal)?;
        self.report_repo.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Apartment, ApartmentCategory, ReportPriority, User};
    use crate::repositories::{
        MockAgentRepository, MockApartmentRepository, MockNotificationRepository,
        MockReportRepository, MockUserRepository,
    };

    struct Fixture {
        service: ReportService,
        apartment_repo: Arc<MockApartmentRepository>,
    }

    fn fixture() -> Fixture {
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        Fixture {
            service: ReportService::new(
                Arc::new(MockReportRepository::new()),
                apartment_repo.clone(),
                Arc::new(MockAgentRepository::new()),
                notifications,
            ),
            apartment_repo,
        }
    }

    fn renter() -> Principal {
        Principal::User(User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
        ))
    }

    async fn listed_apartment(repo: &MockApartmentRepository) -> Apartment {
        repo.create(Apartment::new(
            Uuid::new_v4(),
            "Festac".to_string(),
            350.0,
            ApartmentCategory::OneBedroom,
            "Ground floor flat".to_string(),
            vec![],
        ))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_open_report_rejected() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();

        fx.service
            .create(
                &user,
                apartment.id,
                "Mould in the bathroom".to_string(),
                ReportType::Condition,
            )
            .await
            .unwrap();
        let err = fx
            .service
            .create(
                &user,
                apartment.id,
                "Still mouldy".to_string(),
                ReportType::Condition,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_resolved_report_allows_new_one() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();
        let admin = Principal::Admin(crate::domain::entities::Admin::new(
            "Root".to_string(),
            "root@example.com".to_string(),
            "hash".to_string(),
        ));

        let report = fx
            .service
            .create(
                &user,
                apartment.id,
                "Broken lock".to_string(),
                ReportType::Safety,
            )
            .await
            .unwrap();
        assert_eq!(report.priority, ReportPriority::High);

        fx.service.resolve(&admin, report.id, None).await.unwrap();
        assert!(fx
            .service
            .create(
                &user,
                apartment.id,
                "Lock broke again".to_string(),
                ReportType::Safety,
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_escalate_once() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();

        let report = fx
            .service
            .create(
                &user,
                apartment.id,
                "No hot water".to_string(),
                ReportType::Maintenance,
            )
            .await
            .unwrap();
        let escalated = fx
            .service
            .escalate(&user, report.id, Some("Two weeks now".to_string()))
            .await
            .unwrap();
        assert_eq!(escalated.priority, ReportPriority::High);

        let err = fx
            .service
            .escalate(&user, report.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }
}
