use serde::Deserialize;

use rn_core::domain::entities::AgentStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct DecideAgentRequest {
    pub approve: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AgentListQuery {
    pub status: Option<AgentStatus>,
}
