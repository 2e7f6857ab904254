//! Mock implementation of AgentRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Agent, AgentStatus};
use crate::errors::DomainError;

use super::trait_::AgentRepository;

/// In-memory agent repository
#[derive(Clone, Default)]
pub struct MockAgentRepository {
    agents: Arc<RwLock<HashMap<Uuid, Agent>>>,
}

impl MockAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for MockAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, DomainError> {
        let agents = self.agents.read().await;
        Ok(agents.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>, DomainError> {
        let agents = self.agents.read().await;
        Ok(agents.values().find(|a| a.email == email).cloned())
    }

    async fn create(&self, agent: Agent) -> Result<Agent, DomainError> {
        let mut agents = self.agents.write().await;
        if agents.values().any(|a| a.email == agent.email) {
            return Err(DomainError::conflict("Email already registered"));
        }
        agents.insert(agent.id, agent.clone());
        Ok(agent)
    }

    async fn update(&self, agent: Agent) -> Result<Agent, DomainError> {
        let mut agents = self.agents.write().await;
        if !agents.contains_key(&agent.id) {
            return Err(DomainError::not_found("Agent"));
        }
        agents.insert(agent.id, agent.clone());
        Ok(agent)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut agents = self.agents.write().await;
        Ok(agents.remove(&id).is_some())
    }

    async fn find_all(&self) -> Result<Vec<Agent>, DomainError> {
        let agents = self.agents.read().await;
        let mut all: Vec<Agent> = agents.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_by_status(&self, status: AgentStatus) -> Result<Vec<Agent>, DomainError> {
        let agents = self.agents.read().await;
        let mut matched: Vec<Agent> = agents
            .values()
            .filter(|a| a.status == status)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn count_by_status(&self, status: AgentStatus) -> Result<u64, DomainError> {
        let agents = self.agents.read().await;
        Ok(agents.values().filter(|a| a.status == status).count() as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let agents = self.agents.read().await;
        Ok(agents.len() as u64)
    }
}
