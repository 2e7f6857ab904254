//! Inspection request lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{
    InspectionRequest, InspectionStatus, NotificationPriority, NotificationType, Principal,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{ApartmentRepository, InspectionRepository};
use crate::services::auth::AuthService;
use crate::services::notification::NotificationService;

/// Inspection scheduling service
pub struct InspectionService {
    inspection_repo: Arc<dyn InspectionRepository>,
    apartment_repo: Arc<dyn ApartmentRepository>,
    notifications: Arc<NotificationService>,
}

impl InspectionService {
    pub fn new(
        inspection_repo: Arc<dyn InspectionRepository>,
        apartment_repo: Arc<dyn ApartmentRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            inspection_repo,
            apartment_repo,
            notifications,
        }
    }

    /// Books an inspection slot for the calling user; the date must be in
    /// the future
    pub async fn create(
        &self,
        principal: &Principal,
        apartment_id: Uuid,
        date: DateTime<Utc>,
        time: Option<String>,
        message: Option<String>,
    ) -> DomainResult<InspectionRequest> {
        let user_id = match principal {
            Principal::User(user) => user.id,
            _ => return Err(DomainError::forbidden("Only users can request inspections")),
        };
        if date <= Utc::now() {
            return Err(DomainError::validation(
                "Inspection date must be in the future",
            ));
        }
        let apartment = self
            .apartment_repo
            .find_by_id(apartment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Apartment"))?;
        if !apartment.availability {
            return Err(DomainError::validation(
                "Apartment is not available for inspection",
            ));
        }
        if self
            .inspection_repo
            .find_pending_by_user_and_apartment(user_id, apartment_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                "You already have a pending inspection request for this apartment",
            ));
        }

        let request = self
            .inspection_repo
            .create(InspectionRequest::new(
                user_id,
                apartment.agent_id,
                apartment_id,
                date,
                time,
                message,
            ))
            .await?;
        info!(inspection_id = %request.id, apartment_id = %apartment_id, "inspection requested");
        self.notifications
            .notify_quietly(
                apartment.agent_id,
                NotificationType::Inspection,
                "New inspection request",
                format!("An inspection was requested for {}", apartment.location),
                NotificationPriority::Medium,
                Some(("inspection", request.id)),
            )
            .await;
        Ok(request)
    }

    async fn owned_by_user(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> DomainResult<InspectionRequest> {
        let request = self
            .inspection_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inspection request"))?;
        if !request.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden(
                "You can only manage your own inspection requests",
            ));
        }
        Ok(request)
    }

    /// User cancellation; only pending requests can be cancelled
    pub async fn cancel(&self, principal: &Principal, id: Uuid) -> DomainResult<InspectionRequest> {
        let mut request = self.owned_by_user(principal, id).await?;
        if !request.is_pending() {
            return Err(DomainError::conflict(
                "Only pending inspection requests can be cancelled",
            ));
        }
        request.decide(InspectionStatus::Cancelled, None);
        self.inspection_repo.update(request).await
    }

    /// User reschedule; only pending requests, only to a future date
    pub async fn reschedule(
        &self,
        principal: &Principal,
        id: Uuid,
        date: DateTime<Utc>,
        time: Option<String>,
    ) -> DomainResult<InspectionRequest> {
        let mut request = self.owned_by_user(principal, id).await?;
        if !request.is_pending() {
            return Err(DomainError::conflict(
                "Only pending inspection requests can be rescheduled",
            ));
        }
        if date <= Utc::now() {
            return Err(DomainError::validation(
                "Inspection date must be in the future",
            ));
        }
        request.reschedule(date, time);
        self.inspection_repo.update(request).await
    }

    async fn for_agent(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> DomainResult<InspectionRequest> {
        let request = self
            .inspection_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inspection request"))?;
        if principal.is_admin() {
            return Ok(request);
        }
        let agent_id = AuthService::require_approved_agent(principal)?;
        if request.agent_id != agent_id {
            return Err(DomainError::forbidden(
                "You can only manage inspection requests for your own listings",
            ));
        }
        Ok(request)
    }

    /// Agent decision on a pending request
    pub async fn decide(
        &self,
        principal: &Principal,
        id: Uuid,
        approve: bool,
        rejection_reason: Option<String>,
    ) -> DomainResult<InspectionRequest> {
        let mut request = self.for_agent(principal, id).await?;
        if !request.is_pending() {
            return Err(DomainError::conflict(
                "Only pending inspection requests can be decided",
            ));
        }
        let status = if approve {
            InspectionStatus::Approved
        } else {
            InspectionStatus::Rejected
        };
        request.decide(status, rejection_reason);
        let request = self.inspection_repo.update(request).await?;

        info!(inspection_id = %request.id, status = status.as_str(), "inspection decision applied");
        self.notifications
            .notify_quietly(
                request.user_id,
                NotificationType::Inspection,
                format!("Inspection {}", status.as_str()),
                format!("Your inspection request was {}", status.as_str()),
                NotificationPriority::Medium,
                Some(("inspection", request.id)),
            )
            .await;
        Ok(request)
    }

    /// Marks an approved inspection as completed
    pub async fn complete(
        &self,
        principal: &Principal,
        id: Uuid,
        notes: Option<String>,
        follow_up_required: bool,
    ) -> DomainResult<InspectionRequest> {
        let mut request = self.for_agent(principal, id).await?;
        if request.status != InspectionStatus::Approved {
            return Err(DomainError::conflict(
                "Only approved inspections can be completed",
            ));
        }
        request.complete(notes, follow_up_required);
        self.inspection_repo.update(request).await
    }

    pub async fn list_mine(&self, principal: &Principal) -> DomainResult<Vec<InspectionRequest>> {
        self.inspection_repo.find_by_user(principal.id()).await
    }

    pub async fn list_for_agent(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<InspectionRequest>> {
        let agent_id = AuthService::require_approved_agent(principal)?;
        self.inspection_repo.find_by_agent(agent_id).await
    }

    pub async fn list_all(&self, principal: &Principal) -> DomainResult<Vec<InspectionRequest>> {
        AuthService::require_admin(principal)?;
        self.inspection_repo.find_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Agent, AgentStatus, Apartment, ApartmentCategory, User};
    use crate::repositories::{
        MockApartmentRepository, MockInspectionRepository, MockNotificationRepository,
        MockUserRepository,
    };
    use chrono::Duration;

    struct Fixture {
        service: InspectionService,
        apartment_repo: Arc<MockApartmentRepository>,
    }

    fn fixture() -> Fixture {
        let apartment_repo = Arc::new(MockApartmentRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        Fixture {
            service: InspectionService::new(
                Arc::new(MockInspectionRepository::new()),
                apartment_repo.clone(),
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

    fn owner_of(apartment: &Apartment) -> Principal {
        let mut agent = Agent::new(
            "Owner".to_string(),
            "owner@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
            None,
        );
        agent.id = apartment.agent_id;
        agent.set_status(AgentStatus::Approved);
        Principal::Agent(agent)
    }

    async fn listed_apartment(repo: &MockApartmentRepository) -> Apartment {
        repo.create(Apartment::new(
            Uuid::new_v4(),
            "Gbagada".to_string(),
            500.0,
            ApartmentCategory::Studio,
            "Quiet studio".to_string(),
            vec![],
        ))
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_past_date_rejected() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let err = fx
            .service
            .create(
                &renter(),
                apartment.id,
                Utc::now() - Duration::days(1),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_unavailable_apartment_rejected() {
        let fx = fixture();
        let mut apartment = listed_apartment(&fx.apartment_repo).await;
        apartment.availability = false;
        let apartment = fx.apartment_repo.update(apartment).await.unwrap();

        let err = fx
            .service
            .create(
                &renter(),
                apartment.id,
                Utc::now() + Duration::days(2),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_second_pending_request_conflicts() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();

        let request = fx
            .service
            .create(
                &user,
                apartment.id,
                Utc::now() + Duration::days(2),
                None,
                None,
            )
            .await
            .unwrap();
        let err = fx
            .service
            .create(
                &user,
                apartment.id,
                Utc::now() + Duration::days(3),
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        // A cancelled request no longer blocks a fresh one
        fx.service.cancel(&user, request.id).await.unwrap();
        fx.service
            .create(
                &user,
                apartment.id,
                Utc::now() + Duration::days(4),
                None,
                None,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_only_pending_can_be_cancelled() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();
        let agent = owner_of(&apartment);

        let request = fx
            .service
            .create(
                &user,
                apartment.id,
                Utc::now() + Duration::days(2),
                None,
                None,
            )
            .await
            .unwrap();
        fx.service
            .decide(&agent, request.id, true, None)
            .await
            .unwrap();

        let err = fx.service.cancel(&user, request.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_complete_requires_approval_first() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();
        let agent = owner_of(&apartment);

        let request = fx
            .service
            .create(
                &user,
                apartment.id,
                Utc::now() + Duration::days(2),
                None,
                None,
            )
            .await
            .unwrap();

        let err = fx
            .service
            .complete(&agent, request.id, None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        fx.service
            .decide(&agent, request.id, true, None)
            .await
            .unwrap();
        let done = fx
            .service
            .complete(&agent, request.id, Some("No issues".to_string()), false)
            .await
            .unwrap();
        assert_eq!(done.status, InspectionStatus::Completed);
    }

    #[tokio::test]
    async fn test_reschedule_stays_pending() {
        let fx = fixture();
        let apartment = listed_apartment(&fx.apartment_repo).await;
        let user = renter();

        let request = fx
            .service
            .create(
                &user,
                apartment.id,
                Utc::now() + Duration::days(2),
                None,
                None,
            )
            .await
            .unwrap();
        let moved = fx
            .service
            .reschedule(
                &user,
                request.id,
                Utc::now() + Duration::days(5),
                Some("2:00 PM".to_string()),
            )
            .await
            .unwrap();
        assert!(moved.is_pending());
        assert_eq!(moved.time, "2:00 PM");
    }
}
