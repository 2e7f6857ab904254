//! MySQL implementation of the ReportRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{Report, ReportPriority, ReportStatus, ReportType};
use rn_core::errors::DomainError;
use rn_core::repositories::ReportRepository;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlReportRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, apartment_id, message, report_type, status, priority, \
                       agent_response, responded_at, resolution_notes, resolved_at, \
                       assigned_agent_id, assigned_at, escalated, escalation_notes, \
                       escalated_at, created_at, updated_at";

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_report(row: &sqlx::mysql::MySqlRow) -> Result<Report, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let apartment_id: String = row
            .try_get("apartment_id")
            .map_err(|e| column_err("apartment_id", e))?;
        let report_type: String = row
            .try_get("report_type")
            .map_err(|e| column_err("report_type", e))?;
        let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
        let priority: String = row
            .try_get("priority")
            .map_err(|e| column_err("priority", e))?;
        let assigned_agent_id: Option<String> = row
            .try_get("assigned_agent_id")
            .map_err(|e| column_err("assigned_agent_id", e))?;
        Ok(Report {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            apartment_id: parse_uuid("apartment_id", &apartment_id)?,
            message: row
                .try_get("message")
                .map_err(|e| column_err("message", e))?,
            report_type: parse_enum("report_type", &report_type, ReportType::parse)?,
            status: parse_enum("status", &status, ReportStatus::parse)?,
            priority: parse_enum("priority", &priority, ReportPriority::parse)?,
            agent_response: row
                .try_get("agent_response")
                .map_err(|e| column_err("agent_response", e))?,
            responded_at: row
                .try_get::<Option<DateTime<Utc>>, _>("responded_at")
                .map_err(|e| column_err("responded_at", e))?,
            resolution_notes: row
                .try_get("resolution_notes")
                .map_err(|e| column_err("resolution_notes", e))?,
            resolved_at: row
                .try_get::<Option<DateTime<Utc>>, _>("resolved_at")
                .map_err(|e| column_err("resolved_at", e))?,
            assigned_agent_id: assigned_agent_id
                .as_deref()
                .map(|v| parse_uuid("assigned_agent_id", v))
                .transpose()?,
            assigned_at: row
                .try_get::<Option<DateTime<Utc>>, _>("assigned_at")
                .map_err(|e| column_err("assigned_at", e))?,
            escalated: row
                .try_get("escalated")
                .map_err(|e| column_err("escalated", e))?,
            escalation_notes: row
                .try_get("escalation_notes")
                .map_err(|e| column_err("escalation_notes", e))?,
            escalated_at: row
                .try_get::<Option<DateTime<Utc>>, _>("escalated_at")
                .map_err(|e| column_err("escalated_at", e))?,
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
impl ReportRepository for MySqlReportRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find report", e))?;
        row.as_ref().map(Self::row_to_report).transpose()
    }

    async fn create(&self, report: Report) -> Result<Report, DomainError> {
        let query = r#"
            INSERT INTO reports
                (id, user_id, apartment_id, message, report_type, status, priority,
                 agent_response, responded_at, resolution_notes, resolved_at,
                 assigned_agent_id, assigned_at, escalated, escalation_notes,
                 escalated_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(report.id.to_string())
            .bind(report.user_id.to_string())
            .bind(report.apartment_id.to_string())
            .bind(&report.message)
            .bind(report.report_type.as_str())
            .bind(report.status.as_str())
            .bind(report.priority.as_str())
            .bind(&report.agent_response)
            .bind(report.responded_at)
            .bind(&report.resolution_notes)
            .bind(report.resolved_at)
            .bind(report.assigned_agent_id.map(|id| id.to_string()))
            .bind(report.assigned_at)
            .bind(report.escalated)
            .bind(&report.escalation_notes)
            .bind(report.escalated_at)
            .bind(report.created_at)
            .bind(report.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to create report", e))?;
        Ok(report)
    }

    async fn update(&self, report: Report) -> Result<Report, DomainError> {
        let query = r#"
            UPDATE reports
            SET status = ?, priority = ?, agent_response = ?, responded_at = ?,
                resolution_notes = ?, resolved_at = ?, assigned_agent_id = ?,
                assigned_at = ?, escalated = ?, escalation_notes = ?, escalated_at = ?,
                updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(report.status.as_str())
            .bind(report.priority.as_str())
            .bind(&report.agent_response)
            .bind(report.responded_at)
            .bind(&report.resolution_notes)
            .bind(report.resolved_at)
            .bind(report.assigned_agent_id.map(|id| id.to_string()))
            .bind(report.assigned_at)
            .bind(report.escalated)
            .bind(&report.escalation_notes)
            .bind(report.escalated_at)
            .bind(report.updated_at)
            .bind(report.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update report", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Report"));
        }
        Ok(report)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Report>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM reports WHERE user_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list user reports", e))?;
        rows.iter().map(Self::row_to_report).collect()
    }

    async fn find_by_apartment(&self, apartment_id: Uuid) -> Result<Vec<Report>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE apartment_id = ? ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(apartment_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list apartment reports", e))?;
        rows.iter().map(Self::row_to_report).collect()
    }

    async fn find_recent_open(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Option<Report>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports \
             WHERE user_id = ? AND apartment_id = ? AND created_at >= ? \
               AND status NOT IN ('resolved', 'closed') \
             LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(apartment_id.to_string())
            .bind(since)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find recent open report", e))?;
        row.as_ref().map(Self::row_to_report).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Report>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM reports ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list reports", e))?;
        rows.iter().map(Self::row_to_report).collect()
    }

    async fn count_by_status(&self, status: ReportStatus) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM reports WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count reports", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM reports")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count reports", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }
}
