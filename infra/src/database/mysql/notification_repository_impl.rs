//! MySQL implementation of the NotificationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{MySql, MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{
    Notification, NotificationPriority, NotificationType, RelatedEntity,
};
use rn_core::errors::DomainError;
use rn_core::repositories::{NotificationFilter, NotificationRepository};
use rn_shared::types::Pagination;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlNotificationRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, notification_type, title, message, is_read, is_archived, \
                       priority, related_kind, related_id, expires_at, created_at, updated_at";

impl MySqlNotificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: &sqlx::mysql::MySqlRow) -> Result<Notification, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let notification_type: String = row
            .try_get("notification_type")
            .map_err(|e| column_err("notification_type", e))?;
        let priority: String = row
            .try_get("priority")
            .map_err(|e| column_err("priority", e))?;
        let related_kind: Option<String> = row
            .try_get("related_kind")
            .map_err(|e| column_err("related_kind", e))?;
        let related_id: Option<String> = row
            .try_get("related_id")
            .map_err(|e| column_err("related_id", e))?;
        let related = match (related_kind, related_id) {
            (Some(kind), Some(id)) => Some(RelatedEntity {
                kind,
                id: parse_uuid("related_id", &id)?,
            }),
            _ => None,
        };
        Ok(Notification {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            notification_type: parse_enum(
                "notification_type",
                &notification_type,
                NotificationType::parse,
            )?,
            title: row.try_get("title").map_err(|e| column_err("title", e))?,
            message: row
                .try_get("message")
                .map_err(|e| column_err("message", e))?,
            is_read: row
                .try_get("is_read")
                .map_err(|e| column_err("is_read", e))?,
            is_archived: row
                .try_get("is_archived")
                .map_err(|e| column_err("is_archived", e))?,
            priority: parse_enum("priority", &priority, NotificationPriority::parse)?,
            related,
            expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("expires_at")
                .map_err(|e| column_err("expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
        })
    }

    fn filter_conditions(filter: &NotificationFilter) -> Vec<&'static str> {
        let mut conditions = vec!["user_id = ?"];
        if filter.unread_only {
            conditions.push("is_read = FALSE");
        }
        if !filter.include_archived {
            conditions.push("is_archived = FALSE");
        }
        if filter.notification_type.is_some() {
            conditions.push("notification_type = ?");
        }
        conditions
    }

    fn bind_filter<'q>(
        mut query: Query<'q, MySql, MySqlArguments>,
        user_id: Uuid,
        filter: &NotificationFilter,
    ) -> Query<'q, MySql, MySqlArguments> {
        query = query.bind(user_id.to_string());
        if let Some(notification_type) = filter.notification_type {
            query = query.bind(notification_type.as_str());
        }
        query
    }

    fn bind_insert<'q>(
        query: Query<'q, MySql, MySqlArguments>,
        n: &'q Notification,
    ) -> Query<'q, MySql, MySqlArguments> {
        query
            .bind(n.id.to_string())
            .bind(n.user_id.to_string())
            .bind(n.notification_type.as_str())
            .bind(&n.title)
            .bind(&n.message)
            .bind(n.is_read)
            .bind(n.is_archived)
            .bind(n.priority.as_str())
            .bind(n.related.as_ref().map(|r| r.kind.clone()))
            .bind(n.related.as_ref().map(|r| r.id.to_string()))
            .bind(n.expires_at)
            .bind(n.created_at)
            .bind(n.updated_at)
    }
}

const INSERT: &str = r#"
    INSERT INTO notifications
        (id, user_id, notification_type, title, message, is_read, is_archived,
         priority, related_kind, related_id, expires_at, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl NotificationRepository for MySqlNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find notification", e))?;
        row.as_ref().map(Self::row_to_notification).transpose()
    }

    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        Self::bind_insert(sqlx::query(INSERT), &notification)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to create notification", e))?;
        Ok(notification)
    }

    async fn create_many(
        &self,
        notifications: Vec<Notification>,
    ) -> Result<u64, DomainError> {
        if notifications.is_empty() {
            return Ok(0);
        }
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("Failed to start transaction", e))?;
        for notification in &notifications {
            Self::bind_insert(sqlx::query(INSERT), notification)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_err("Failed to create notification batch", e))?;
        }
        tx.commit()
            .await
            .map_err(|e| db_err("Failed to commit notification batch", e))?;
        Ok(notifications.len() as u64)
    }

    async fn update(&self, notification: Notification) -> Result<Notification, DomainError> {
        let query = r#"
            UPDATE notifications
            SET is_read = ?, is_archived = ?, updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(notification.is_read)
            .bind(notification.is_archived)
            .bind(notification.updated_at)
            .bind(notification.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update notification", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Notification"));
        }
        Ok(notification)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete notification", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Notification>, DomainError> {
        let conditions = Self::filter_conditions(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM notifications WHERE {} \
             ORDER BY created_at DESC LIMIT ? OFFSET ?",
            conditions.join(" AND ")
        );
        let rows = Self::bind_filter(sqlx::query(&query), user_id, filter)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list notifications", e))?;
        rows.iter().map(Self::row_to_notification).collect()
    }

    async fn count_by_user(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
    ) -> Result<u64, DomainError> {
        let conditions = Self::filter_conditions(filter);
        let query = format!(
            "SELECT COUNT(*) as total FROM notifications WHERE {}",
            conditions.join(" AND ")
        );
        let row = Self::bind_filter(sqlx::query(&query), user_id, filter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count notifications", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let row = sqlx::query(
            "SELECT COUNT(*) as total FROM notifications \
             WHERE user_id = ? AND is_read = FALSE AND is_archived = FALSE",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count unread notifications", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = ? \
             WHERE user_id = ? AND is_read = FALSE",
        )
        .bind(Utc::now())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to mark notifications read", e))?;
        Ok(result.rows_affected())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE expires_at IS NOT NULL AND expires_at <= ?",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to purge expired notifications", e))?;
        Ok(result.rows_affected())
    }
}
