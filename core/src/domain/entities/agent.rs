//! Agent entity representing a listing agent awaiting or holding approval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Onboarding status of an agent account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// Registered, awaiting admin review
    Pending,
    /// Cleared to manage listings
    Approved,
    /// Turned down by an admin
    Rejected,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A listing agent account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// Bcrypt hash of the password, never serialized in responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub phone: String,

    /// Filesystem path of the uploaded certificate blob
    pub certificate: Option<String>,

    /// Admin approval status; only approved agents can manage listings
    pub status: AgentStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Agent {
    /// Creates a new Agent in pending status
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        phone: String,
        certificate: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone,
            certificate,
            status: AgentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == AgentStatus::Approved
    }

    /// Applies an admin approval decision
    pub fn set_status(&mut self, status: AgentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_starts_pending() {
        let agent = Agent::new(
            "Bola".to_string(),
            "bola@example.com".to_string(),
            "hash".to_string(),
            "0800".to_string(),
            Some("uploads/cert.pdf".to_string()),
        );
        assert_eq!(agent.status, AgentStatus::Pending);
        assert!(!agent.is_approved());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AgentStatus::Pending,
            AgentStatus::Approved,
            AgentStatus::Rejected,
        ] {
            assert_eq!(AgentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AgentStatus::parse("unknown"), None);
    }
}
