//! Notification entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event category of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Booking,
    Inspection,
    Report,
    Payment,
    Review,
    System,
    Alert,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking => "booking",
            Self::Inspection => "inspection",
            Self::Report => "report",
            Self::Payment => "payment",
            Self::Review => "review",
            Self::System => "system",
            Self::Alert => "alert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "booking" => Some(Self::Booking),
            "inspection" => Some(Self::Inspection),
            "report" => Some(Self::Report),
            "payment" => Some(Self::Payment),
            "review" => Some(Self::Review),
            "system" => Some(Self::System),
            "alert" => Some(Self::Alert),
            _ => None,
        }
    }
}

/// Display priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl NotificationPriority {
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

/// Link from a notification to the entity that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntity {
    /// Entity kind, e.g. "booking" or "payment"
    pub kind: String,
    pub id: Uuid,
}

/// A message delivered to a user's notification feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub is_archived: bool,
    pub priority: NotificationPriority,
    pub related: Option<RelatedEntity>,
    /// Purged by the expiry sweep once past
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        notification_type: NotificationType,
        title: String,
        message: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            notification_type,
            title,
            message,
            is_read: false,
            is_archived: false,
            priority: NotificationPriority::default(),
            related: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_related(mut self, kind: impl Into<String>, id: Uuid) -> Self {
        self.related = Some(RelatedEntity {
            kind: kind.into(),
            id,
        });
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
        self.updated_at = Utc::now();
    }

    pub fn archive(&mut self) {
        self.is_archived = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_builder_defaults() {
        let n = Notification::new(
            Uuid::new_v4(),
            NotificationType::Booking,
            "Booking approved".to_string(),
            "Your booking was approved".to_string(),
        );
        assert!(!n.is_read);
        assert!(!n.is_archived);
        assert_eq!(n.priority, NotificationPriority::Medium);
        assert!(n.expires_at.is_none());
    }

    #[test]
    fn test_expiry() {
        let n = Notification::new(
            Uuid::new_v4(),
            NotificationType::System,
            "Maintenance".to_string(),
            "Scheduled downtime".to_string(),
        )
        .with_expiry(Utc::now() - Duration::hours(1));
        assert!(n.is_expired(Utc::now()));
    }
}
