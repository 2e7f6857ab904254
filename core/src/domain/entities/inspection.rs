//! Inspection request entity and its lifecycle.
//!
//! Lifecycle: `pending -> {approved, rejected} -> completed` (agent side),
//! `pending -> cancelled` and reschedule (user side, pending only). The
//! inspection lifecycle is independent of bookings and payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inspection request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    Cancelled,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A request by a user to inspect an apartment at a given date and time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Owning agent of the apartment at request time
    pub agent_id: Uuid,
    pub apartment_id: Uuid,
    pub date: DateTime<Utc>,
    pub time: String,
    pub message: Option<String>,
    pub status: InspectionStatus,
    pub rejection_reason: Option<String>,
    pub completion_notes: Option<String>,
    pub follow_up_required: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default appointment time when the requester does not pick one
pub const DEFAULT_INSPECTION_TIME: &str = "10:00 AM";

impl InspectionRequest {
    /// Creates a new pending inspection request
    pub fn new(
        user_id: Uuid,
        agent_id: Uuid,
        apartment_id: Uuid,
        date: DateTime<Utc>,
        time: Option<String>,
        message: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            agent_id,
            apartment_id,
            date,
            time: time.unwrap_or_else(|| DEFAULT_INSPECTION_TIME.to_string()),
            message,
            status: InspectionStatus::Pending,
            rejection_reason: None,
            completion_notes: None,
            follow_up_required: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_pending(&self) -> bool {
        self.status == InspectionStatus::Pending
    }

    /// Applies an agent decision; the reason is only kept for rejections
    pub fn decide(&mut self, status: InspectionStatus, rejection_reason: Option<String>) {
        self.status = status;
        if status == InspectionStatus::Rejected {
            self.rejection_reason = rejection_reason;
        }
        self.updated_at = Utc::now();
    }

    /// Marks an approved inspection as done
    pub fn complete(&mut self, notes: Option<String>, follow_up_required: bool) {
        self.status = InspectionStatus::Completed;
        self.completion_notes = notes;
        self.follow_up_required = follow_up_required;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Moves a pending request to a new date, staying pending
    pub fn reschedule(&mut self, date: DateTime<Utc>, time: Option<String>) {
        self.date = date;
        if let Some(time) = time {
            self.time = time;
        }
        self.status = InspectionStatus::Pending;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> InspectionRequest {
        InspectionRequest::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now() + Duration::days(3),
            None,
            None,
        )
    }

    #[test]
    fn test_new_request_defaults() {
        let request = sample();
        assert!(request.is_pending());
        assert_eq!(request.time, DEFAULT_INSPECTION_TIME);
        assert!(!request.follow_up_required);
    }

    #[test]
    fn test_rejection_keeps_reason() {
        let mut request = sample();
        request.decide(
            InspectionStatus::Rejected,
            Some("Unit under renovation".to_string()),
        );
        assert_eq!(request.status, InspectionStatus::Rejected);
        assert!(request.rejection_reason.is_some());
    }

    #[test]
    fn test_approval_discards_reason() {
        let mut request = sample();
        request.decide(InspectionStatus::Approved, Some("ignored".to_string()));
        assert!(request.rejection_reason.is_none());
    }

    #[test]
    fn test_complete_stamps_time() {
        let mut request = sample();
        request.decide(InspectionStatus::Approved, None);
        request.complete(Some("All good".to_string()), true);
        assert_eq!(request.status, InspectionStatus::Completed);
        assert!(request.completed_at.is_some());
        assert!(request.follow_up_required);
    }
}
