//! Authenticated caller identity.
//!
//! A [`Principal`] is resolved exactly once at the authentication boundary
//! from the token claims and carries the full account record for its role.
//! Handlers and services branch on the closed enum instead of re-reading
//! role strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::admin::Admin;
use super::agent::Agent;
use super::user::User;

/// Account role encoded in token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "agent" => Some(Self::Agent),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// The authenticated account making a request
#[derive(Debug, Clone)]
pub enum Principal {
    User(User),
    Agent(Agent),
    Admin(Admin),
}

impl Principal {
    /// Account id of the caller
    pub fn id(&self) -> Uuid {
        match self {
            Self::User(u) => u.id,
            Self::Agent(a) => a.id,
            Self::Admin(a) => a.id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::User(_) => Role::User,
            Self::Agent(_) => Role::Agent,
            Self::Admin(_) => Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// True for agents whose application has been approved
    pub fn is_approved_agent(&self) -> bool {
        matches!(self, Self::Agent(a) if a.is_approved())
    }

    pub fn as_agent(&self) -> Option<&Agent> {
        match self {
            Self::Agent(a) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::agent::AgentStatus;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Agent, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_pending_agent_is_not_approved() {
        let agent = Agent::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800000000".to_string(),
            None,
        );
        let principal = Principal::Agent(agent);
        assert!(!principal.is_approved_agent());
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_approved_agent() {
        let mut agent = Agent::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
            "0800000000".to_string(),
            None,
        );
        agent.set_status(AgentStatus::Approved);
        assert!(Principal::Agent(agent).is_approved_agent());
    }
}
