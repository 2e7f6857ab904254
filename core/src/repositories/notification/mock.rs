//! Mock implementation of NotificationRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Notification;
use crate::errors::DomainError;
use rn_shared::types::Pagination;

use super::trait_::{NotificationFilter, NotificationRepository};

/// In-memory notification repository
#[derive(Clone, Default)]
pub struct MockNotificationRepository {
    notifications: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl MockNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(notification: &Notification, user_id: Uuid, filter: &NotificationFilter) -> bool {
    if notification.user_id != user_id {
        return false;
    }
    if filter.unread_only && notification.is_read {
        return false;
    }
    if !filter.include_archived && notification.is_archived {
        return false;
    }
    if let Some(kind) = filter.notification_type {
        if notification.notification_type != kind {
            return false;
        }
    }
    true
}

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, DomainError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.get(&id).cloned())
    }

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        let mut notifications = self.notifications.write().await;
        notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn create_many(&self, batch: Vec<Notification>) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.write().await;
        let inserted = batch.len() as u64;
        for notification in batch {
            notifications.insert(notification.id, notification);
        }
        Ok(inserted)
    }

    async fn update(&self, notification: Notification) -> Result<Notification, DomainError> {
        let mut notifications = self.notifications.write().await;
        if !notifications.contains_key(&notification.id) {
            return Err(DomainError::not_found("Notification"));
        }
        notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.remove(&id).is_some())
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Notification>, DomainError> {
        let notifications = self.notifications.read().await;
        let mut feed: Vec<Notification> = notifications
            .values()
            .filter(|n| matches(n, user_id, filter))
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(feed
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .collect())
    }

    async fn count_by_user(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
    ) -> Result<u64, DomainError> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .values()
            .filter(|n| matches(n, user_id, filter))
            .count() as u64)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .values()
            .filter(|n| n.user_id == user_id && !n.is_read && !n.is_archived)
            .count() as u64)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.write().await;
        let mut flipped = 0;
        for notification in notifications.values_mut() {
            if notification.user_id == user_id && !notification.is_read {
                notification.mark_read();
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|_, n| !n.is_expired(now));
        Ok((before - notifications.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NotificationType;
    use chrono::Duration;

    fn sample(user_id: Uuid) -> Notification {
        Notification::new(
            user_id,
            NotificationType::System,
            "Hello".to_string(),
            "World".to_string(),
        )
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let repo = MockNotificationRepository::new();
        let user = Uuid::new_v4();
        repo.create(sample(user)).await.unwrap();
        repo.create(sample(user)).await.unwrap();
        repo.create(sample(Uuid::new_v4())).await.unwrap();

        assert_eq!(repo.mark_all_read(user).await.unwrap(), 2);
        assert_eq!(repo.count_unread(user).await.unwrap(), 0);
        // Re-running is a no-op
        assert_eq!(repo.mark_all_read(user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let repo = MockNotificationRepository::new();
        let user = Uuid::new_v4();
        repo.create(sample(user).with_expiry(Utc::now() - Duration::hours(1)))
            .await
            .unwrap();
        repo.create(sample(user)).await.unwrap();

        assert_eq!(repo.purge_expired(Utc::now()).await.unwrap(), 1);
        let filter = NotificationFilter::default();
        assert_eq!(repo.count_by_user(user, &filter).await.unwrap(), 1);
    }
}
