use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use rn_core::domain::entities::{NotificationPriority, NotificationType};
use rn_core::repositories::NotificationFilter;
use rn_shared::types::Pagination;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default)]
    pub include_archived: bool,
    pub notification_type: Option<NotificationType>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl NotificationQuery {
    pub fn filter(&self) -> NotificationFilter {
        NotificationFilter {
            unread_only: self.unread_only,
            include_archived: self.include_archived,
            notification_type: self.notification_type,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page.unwrap_or(1), self.per_page.unwrap_or(20))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BroadcastRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub expires_at: Option<DateTime<Utc>>,
}
