//! Report entity: user complaints about a listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of issue being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Fraud,
    Safety,
    Condition,
    Noise,
    Maintenance,
    General,
    Other,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fraud => "fraud",
            Self::Safety => "safety",
            Self::Condition => "condition",
            Self::Noise => "noise",
            Self::Maintenance => "maintenance",
            Self::General => "general",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fraud" => Some(Self::Fraud),
            "safety" => Some(Self::Safety),
            "condition" => Some(Self::Condition),
            "noise" => Some(Self::Noise),
            "maintenance" => Some(Self::Maintenance),
            "general" => Some(Self::General),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Fraud and safety reports are triaged at high priority
    pub fn default_priority(&self) -> ReportPriority {
        match self {
            Self::Fraud | Self::Safety => ReportPriority::High,
            _ => ReportPriority::Medium,
        }
    }
}

/// Report handling status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Assigned,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Assigned => "assigned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            "assigned" => Some(Self::Assigned),
            _ => None,
        }
    }
}

/// Triage priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
}

impl ReportPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A user-submitted complaint about an apartment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub apartment_id: Uuid,
    pub message: String,
    pub report_type: ReportType,
    pub status: ReportStatus,
    pub priority: ReportPriority,
    pub agent_response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub assigned_agent_id: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub escalated: bool,
    pub escalation_notes: Option<String>,
    pub escalated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Creates a new open report, triaged by report type
    pub fn new(user_id: Uuid, apartment_id: Uuid, message: String, report_type: ReportType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            apartment_id,
            message,
            report_type,
            status: ReportStatus::Open,
            priority: report_type.default_priority(),
            agent_response: None,
            responded_at: None,
            resolution_notes: None,
            resolved_at: None,
            assigned_agent_id: None,
            assigned_at: None,
            escalated: false,
            escalation_notes: None,
            escalated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn respond(&mut self, response: String) {
        self.agent_response = Some(response);
        self.responded_at = Some(Utc::now());
        self.status = ReportStatus::InProgress;
        self.updated_at = Utc::now();
    }

    pub fn resolve(&mut self, notes: Option<String>) {
        self.status = ReportStatus::Resolved;
        self.resolution_notes = notes;
        self.resolved_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn assign(&mut self, agent_id: Uuid) {
        self.assigned_agent_id = Some(agent_id);
        self.assigned_at = Some(Utc::now());
        self.status = ReportStatus::Assigned;
        self.updated_at = Utc::now();
    }

    pub fn escalate(&mut self, notes: Option<String>) {
        self.escalated = true;
        self.escalation_notes = notes;
        self.escalated_at = Some(Utc::now());
        self.priority = ReportPriority::High;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraud_reports_are_high_priority() {
        let report = Report::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Listing photos are fake".to_string(),
            ReportType::Fraud,
        );
        assert_eq!(report.priority, ReportPriority::High);
        assert_eq!(report.status, ReportStatus::Open);
    }

    #[test]
    fn test_general_reports_are_medium_priority() {
        let report = Report::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Broken tap".to_string(),
            ReportType::General,
        );
        assert_eq!(report.priority, ReportPriority::Medium);
    }

    #[test]
    fn test_resolution_flow() {
        let mut report = Report::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Noisy neighbours".to_string(),
            ReportType::Noise,
        );
        report.respond("We spoke to the tenants".to_string());
        assert_eq!(report.status, ReportStatus::InProgress);
        report.resolve(Some("Quiet hours agreed".to_string()));
        assert_eq!(report.status, ReportStatus::Resolved);
        assert!(report.resolved_at.is_some());
    }

    #[test]
    fn test_escalation_raises_priority() {
        let mut report = Report::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "No response".to_string(),
            ReportType::Maintenance,
        );
        report.escalate(None);
        assert!(report.escalated);
        assert_eq!(report.priority, ReportPriority::High);
    }
}
