//! Admin console operations: account oversight and agent approval.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{
    Agent, AgentStatus, NotificationPriority, NotificationType, Principal, User,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{AgentRepository, UserRepository};
use crate::services::auth::AuthService;
use crate::services::notification::NotificationService;

/// Admin console service
pub struct AdminService {
    user_repo: Arc<dyn UserRepository>,
    agent_repo: Arc<dyn AgentRepository>,
    notifications: Arc<NotificationService>,
}

impl AdminService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        agent_repo: Arc<dyn AgentRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            user_repo,
            agent_repo,
            notifications,
        }
    }

    pub async fn list_users(&self, principal: &Principal) -> DomainResult<Vec<User>> {
        AuthService::require_admin(principal)?;
        self.user_repo.find_all().await
    }

    pub async fn delete_user(&self, principal: &Principal, user_id: Uuid) -> DomainResult<()> {
        AuthService::require_admin(principal)?;
        if !self.user_repo.delete(user_id).await? {
            return Err(DomainError::not_found("User"));
        }
        info!(user_id = %user_id, "user account removed by admin");
        Ok(())
    }

    /// All agents, optionally narrowed to one approval status
    pub async fn list_agents(
        &self,
        principal: &Principal,
        status: Option<AgentStatus>,
    ) -> DomainResult<Vec<Agent>> {
        AuthService::require_admin(principal)?;
        match status {
            Some(status) => self.agent_repo.find_by_status(status).await,
            None => self.agent_repo.find_all().await,
        }
    }

    /// Approves or rejects a pending agent application
    pub async fn decide_agent(
        &self,
        principal: &Principal,
        agent_id: Uuid,
        approve: bool,
    ) -> DomainResult<Agent> {
        AuthService::require_admin(principal)?;
        let mut agent = self
            .agent_repo
            .find_by_id(agent_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Agent"))?;
        if agent.status != AgentStatus::Pending {
            return Err(DomainError::conflict(
                "Agent application has already been decided",
            ));
        }

        let status = if approve {
            AgentStatus::Approved
        } else {
            AgentStatus::Rejected
        };
        agent.set_status(status);
        let agent = self.agent_repo.update(agent).await?;

        info!(agent_id = %agent_id, status = status.as_str(), "agent application decided");
        self.notifications
            .notify_quietly(
                agent_id,
                NotificationType::System,
                format!("Application {}", status.as_str()),
                format!("Your agent application was {}", status.as_str()),
                NotificationPriority::High,
                None,
            )
            .await;
        Ok(agent)
    }

    pub async fn delete_agent(&self, principal: &Principal, agent_id: Uuid) -> DomainResult<()> {
        AuthService::require_admin(principal)?;
        if !self.agent_repo.delete(agent_id).await? {
            return Err(DomainError::not_found("Agent"));
        }
        info!(agent_id = %agent_id, "agent account removed by admin");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Admin;
    use crate::repositories::{
        MockAgentRepository, MockNotificationRepository, MockUserRepository,
    };

    struct Fixture {
        service: AdminService,
        agent_repo: Arc<MockAgentRepository>,
    }

    fn fixture() -> Fixture {
        let agent_repo = Arc::new(MockAgentRepository::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            Arc::new(MockUserRepository::new()),
        ));
        Fixture {
            service: AdminService::new(
                Arc::new(MockUserRepository::new()),
                agent_repo.clone(),
                notifications,
            ),
            agent_repo,
        }
    }

    fn admin() -> Principal {
        Principal::Admin(Admin::new(
            "Root".to_string(),
            "root@example.com".to_string(),
            "hash".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_agent_decision_is_one_shot() {
        let fx = fixture();
        let agent = fx
            .agent_repo
            .create(Agent::new(
                "Bola".to_string(),
                "bola@example.com".to_string(),
                "hash".to_string(),
                "0800".to_string(),
                None,
            ))
            .await
            .unwrap();

        let approved = fx
            .service
            .decide_agent(&admin(), agent.id, true)
            .await
            .unwrap();
        assert_eq!(approved.status, AgentStatus::Approved);

        let err = fx
            .service
            .decide_agent(&admin(), agent.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_non_admin_rejected() {
        let fx = fixture();
        let user = Principal::User(User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
        ));
        assert!(matches!(
            fx.service.list_users(&user).await,
            Err(DomainError::Forbidden { .. })
        ));
    }
}
