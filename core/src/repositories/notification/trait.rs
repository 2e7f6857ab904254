//! Notification repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Notification, NotificationType};
use crate::errors::DomainError;
use rn_shared::types::Pagination;

/// Feed filter for one user's notifications
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFilter {
    pub unread_only: bool,
    /// Archived entries are hidden unless asked for
    pub include_archived: bool,
    pub notification_type: Option<NotificationType>,
}

/// Persistence contract for [`Notification`] records
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, DomainError>;

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError>;

    /// Inserts a batch in one go; used for broadcasts
    async fn create_many(
        &self,
        notifications: Vec<Notification>,
    ) -> Result<u64, DomainError>;

    async fn update(&self, notification: Notification) -> Result<Notification, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Filtered page of one user's feed, newest first
    async fn find_by_user(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Notification>, DomainError>;

    async fn count_by_user(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
    ) -> Result<u64, DomainError>;

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Marks every unread entry read; returns how many were flipped
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError>;

    /// Deletes entries whose expiry has passed; returns how many
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}
