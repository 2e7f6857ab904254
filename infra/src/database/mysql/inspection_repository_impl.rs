//! MySQL implementation of the InspectionRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{InspectionRequest, InspectionStatus};
use rn_core::errors::DomainError;
use rn_core::repositories::InspectionRepository;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlInspectionRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, agent_id, apartment_id, date, time, message, status, \
                       rejection_reason, completion_notes, follow_up_required, completed_at, \
                       created_at, updated_at";

impl MySqlInspectionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_request(row: &sqlx::mysql::MySqlRow) -> Result<InspectionRequest, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let agent_id: String = row
            .try_get("agent_id")
            .map_err(|e| column_err("agent_id", e))?;
        let apartment_id: String = row
            .try_get("apartment_id")
            .map_err(|e| column_err("apartment_id", e))?;
        let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
        Ok(InspectionRequest {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            agent_id: parse_uuid("agent_id", &agent_id)?,
            apartment_id: parse_uuid("apartment_id", &apartment_id)?,
            date: row
                .try_get::<DateTime<Utc>, _>("date")
                .map_err(|e| column_err("date", e))?,
            time: row.try_get("time").map_err(|e| column_err("time", e))?,
            message: row
                .try_get("message")
                .map_err(|e| column_err("message", e))?,
            status: parse_enum("status", &status, InspectionStatus::parse)?,
            rejection_reason: row
                .try_get("rejection_reason")
                .map_err(|e| column_err("rejection_reason", e))?,
            completion_notes: row
                .try_get("completion_notes")
                .map_err(|e| column_err("completion_notes", e))?,
            follow_up_required: row
                .try_get("follow_up_required")
                .map_err(|e| column_err("follow_up_required", e))?,
            completed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("completed_at")
                .map_err(|e| column_err("completed_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
        })
    }
}

#[async_trait]
impl InspectionRepository for MySqlInspectionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<InspectionRequest>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM inspection_requests WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find inspection request", e))?;
        row.as_ref().map(Self::row_to_request).transpose()
    }

    async fn create(
        &self,
        request: InspectionRequest,
    ) -> Result<InspectionRequest, DomainError> {
        let query = r#"
            INSERT INTO inspection_requests
                (id, user_id, agent_id, apartment_id, date, time, message, status,
                 rejection_reason, completion_notes, follow_up_required, completed_at,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(request.id.to_string())
            .bind(request.user_id.to_string())
            .bind(request.agent_id.to_string())
            .bind(request.apartment_id.to_string())
            .bind(request.date)
            .bind(&request.time)
            .bind(&request.message)
            .bind(request.status.as_str())
            .bind(&request.rejection_reason)
            .bind(&request.completion_notes)
            .bind(request.follow_up_required)
            .bind(request.completed_at)
            .bind(request.created_at)
            .bind(request.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to create inspection request", e))?;
        Ok(request)
    }

    async fn update(
        &self,
        request: InspectionRequest,
    ) -> Result<InspectionRequest, DomainError> {
        let query = r#"
            UPDATE inspection_requests
            SET date = ?, time = ?, message = ?, status = ?, rejection_reason = ?,
                completion_notes = ?, follow_up_required = ?, completed_at = ?, updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(request.date)
            .bind(&request.time)
            .bind(&request.message)
            .bind(request.status.as_str())
            .bind(&request.rejection_reason)
            .bind(&request.completion_notes)
            .bind(request.follow_up_required)
            .bind(request.completed_at)
            .bind(request.updated_at)
            .bind(request.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update inspection request", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Inspection request"));
        }
        Ok(request)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM inspection_requests WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete inspection request", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InspectionRequest>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspection_requests WHERE user_id = ? \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list user inspection requests", e))?;
        rows.iter().map(Self::row_to_request).collect()
    }

    async fn find_pending_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<InspectionRequest>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspection_requests \
             WHERE user_id = ? AND apartment_id = ? AND status = ? LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(apartment_id.to_string())
            .bind(InspectionStatus::Pending.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to look up pending inspection request", e))?;
        row.as_ref().map(Self::row_to_request).transpose()
    }

    async fn find_by_agent(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<InspectionRequest>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM inspection_requests WHERE agent_id = ? \
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(agent_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list agent inspection requests", e))?;
        rows.iter().map(Self::row_to_request).collect()
    }

    async fn find_all(&self) -> Result<Vec<InspectionRequest>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM inspection_requests ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list inspection requests", e))?;
        rows.iter().map(Self::row_to_request).collect()
    }

    async fn count_by_status(&self, status: InspectionStatus) -> Result<u64, DomainError> {
        let row =
            sqlx::query("SELECT COUNT(*) as total FROM inspection_requests WHERE status = ?")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_err("Failed to count inspection requests", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM inspection_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count inspection requests", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }
}
