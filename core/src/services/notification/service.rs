//! Notification feed management and domain event delivery.
//!
//! Other services call [`NotificationService::notify`] after their own
//! state change has committed. Delivery failures are logged and swallowed
//! there so a missed notification never rolls back a booking or payment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{
    Notification, NotificationPriority, NotificationType, Principal,
};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{NotificationFilter, NotificationRepository, UserRepository};
use rn_shared::types::{PaginatedResponse, Pagination};

/// Notification feed service
pub struct NotificationService {
    notification_repo: Arc<dyn NotificationRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl NotificationService {
    pub fn new(
        notification_repo: Arc<dyn NotificationRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
        }
    }

    /// Delivers one notification to one account feed
    pub async fn notify(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: NotificationPriority,
        related: Option<(&str, Uuid)>,
    ) -> DomainResult<Notification> {
        let mut notification =
            Notification::new(user_id, notification_type, title.into(), message.into())
                .with_priority(priority);
        if let Some((kind, id)) = related {
            notification = notification.with_related(kind, id);
        }
        let stored = self.notification_repo.create(notification).await?;
        debug!(user_id = %user_id, kind = notification_type.as_str(), "notification delivered");
        Ok(stored)
    }

    /// Best-effort variant used by other services after their state change
    /// has already committed
    pub async fn notify_quietly(
        &self,
        user_id: Uuid,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: NotificationPriority,
        related: Option<(&str, Uuid)>,
    ) {
        if let Err(e) = self
            .notify(user_id, notification_type, title, message, priority, related)
            .await
        {
            warn!(user_id = %user_id, error = %e, "failed to deliver notification");
        }
    }

    /// Sends the same system notice to every user account; admin only
    pub async fn broadcast(
        &self,
        principal: &Principal,
        title: String,
        message: String,
        priority: NotificationPriority,
        expires_at: Option<DateTime<Utc>>,
    ) -> DomainResult<u64> {
        if !principal.is_admin() {
            return Err(DomainError::forbidden("Admin access required"));
        }
        let users = self.user_repo.find_all().await?;
        let batch: Vec<Notification> = users
            .iter()
            .map(|user| {
                let mut n = Notification::new(
                    user.id,
                    NotificationType::System,
                    title.clone(),
                    message.clone(),
                )
                .with_priority(priority);
                if let Some(at) = expires_at {
                    n = n.with_expiry(at);
                }
                n
            })
            .collect();
        let delivered = self.notification_repo.create_many(batch).await?;
        info!(recipients = delivered, "broadcast delivered");
        Ok(delivered)
    }

    /// One page of the caller's feed
    pub async fn feed(
        &self,
        principal: &Principal,
        filter: NotificationFilter,
        pagination: Pagination,
    ) -> DomainResult<PaginatedResponse<Notification>> {
        let user_id = principal.id();
        let page = self
            .notification_repo
            .find_by_user(user_id, &filter, &pagination)
            .await?;
        let total = self
            .notification_repo
            .count_by_user(user_id, &filter)
            .await?;
        Ok(PaginatedResponse::new(page, &pagination, total))
    }

    pub async fn unread_count(&self, principal: &Principal) -> DomainResult<u64> {
        self.notification_repo.count_unread(principal.id()).await
    }

    async fn owned(&self, principal: &Principal, id: Uuid) -> DomainResult<Notification> {
        let notification = self
            .notification_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification"))?;
        if !notification.is_owned_by(principal.id()) {
            return Err(DomainError::forbidden(
                "You can only manage your own notifications",
            ));
        }
        Ok(notification)
    }

    pub async fn mark_read(&self, principal: &Principal, id: Uuid) -> DomainResult<Notification> {
        let mut notification = self.owned(principal, id).await?;
        notification.mark_read();
        self.notification_repo.update(notification).await
    }

    pub async fn mark_all_read(&self, principal: &Principal) -> DomainResult<u64> {
        self.notification_repo.mark_all_read(principal.id()).await
    }

    pub async fn archive(&self, principal: &Principal, id: Uuid) -> DomainResult<Notification> {
        let mut notification = self.owned(principal, id).await?;
        notification.archive();
        self.notification_repo.update(notification).await
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> DomainResult<()> {
        self.owned(principal, id).await?;
        self.notification_repo.delete(id).await?;
        Ok(())
    }

    /// Drops expired entries; called periodically and before admin stats
    pub async fn purge_expired(&self) -> DomainResult<u64> {
        let purged = self.notification_repo.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!(purged, "expired notifications purged");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::User;
    use crate::repositories::{MockNotificationRepository, MockUserRepository};

    async fn setup() -> (NotificationService, Arc<MockUserRepository>) {
        let user_repo = Arc::new(MockUserRepository::new());
        let service = NotificationService::new(
            Arc::new(MockNotificationRepository::new()),
            user_repo.clone(),
        );
        (service, user_repo)
    }

    fn user_principal(user: User) -> Principal {
        Principal::User(user)
    }

    #[tokio::test]
    async fn test_feed_is_scoped_to_owner() {
        let (service, user_repo) = setup().await;
        let alice = user_repo
            .create(User::new(
                "Alice".to_string(),
                "alice@example.com".to_string(),
                "h".to_string(),
                "0800".to_string(),
            ))
            .await
            .unwrap();
        let bob = user_repo
            .create(User::new(
                "Bob".to_string(),
                "bob@example.com".to_string(),
                "h".to_string(),
                "0801".to_string(),
            ))
            .await
            .unwrap();

        service
            .notify(
                alice.id,
                NotificationType::Booking,
                "Approved",
                "Your booking was approved",
                NotificationPriority::Medium,
                None,
            )
            .await
            .unwrap();

        let principal = user_principal(bob);
        let feed = service
            .feed(
                &principal,
                NotificationFilter::default(),
                Pagination::default(),
            )
            .await
            .unwrap();
        assert!(feed.data.is_empty());
    }

    #[tokio::test]
    async fn test_mark_read_requires_ownership() {
        let (service, user_repo) = setup().await;
        let alice = user_repo
            .create(User::new(
                "Alice".to_string(),
                "alice@example.com".to_string(),
                "h".to_string(),
                "0800".to_string(),
            ))
            .await
            .unwrap();
        let bob = user_repo
            .create(User::new(
                "Bob".to_string(),
                "bob@example.com".to_string(),
                "h".to_string(),
                "0801".to_string(),
            ))
            .await
            .unwrap();

        let notification = service
            .notify(
                alice.id,
                NotificationType::System,
                "Hi",
                "There",
                NotificationPriority::Low,
                None,
            )
            .await
            .unwrap();

        let bob_principal = user_principal(bob);
        let err = service
            .mark_read(&bob_principal, notification.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        let alice_principal = user_principal(alice);
        let read = service
            .mark_read(&alice_principal, notification.id)
            .await
            .unwrap();
        assert!(read.is_read);
    }

    #[tokio::test]
    async fn test_broadcast_requires_admin() {
        let (service, user_repo) = setup().await;
        let user = user_repo
            .create(User::new(
                "Alice".to_string(),
                "alice@example.com".to_string(),
                "h".to_string(),
                "0800".to_string(),
            ))
            .await
            .unwrap();

        let principal = user_principal(user);
        let err = service
            .broadcast(
                &principal,
                "Maintenance".to_string(),
                "Scheduled downtime".to_string(),
                NotificationPriority::High,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));
    }
}
