//! Agent repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Agent, AgentStatus};
use crate::errors::DomainError;

/// Persistence contract for [`Agent`] accounts
#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, DomainError>;

    /// Emails are unique across agent accounts
    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>, DomainError>;

    async fn create(&self, agent: Agent) -> Result<Agent, DomainError>;

    async fn update(&self, agent: Agent) -> Result<Agent, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// All agents, newest first
    async fn find_all(&self) -> Result<Vec<Agent>, DomainError>;

    /// Agents in a given approval status, newest first
    async fn find_by_status(&self, status: AgentStatus) -> Result<Vec<Agent>, DomainError>;

    async fn count_by_status(&self, status: AgentStatus) -> Result<u64, DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}
