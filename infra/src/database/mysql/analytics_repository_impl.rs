//! MySQL implementation of the AnalyticsRepository trait.
//!
//! Snapshots are unique per (date, period); `upsert` rides on that key
//! with INSERT ... ON DUPLICATE KEY UPDATE so re-collecting a slot
//! replaces it in place.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySqlPool, Row};

use rn_core::domain::entities::{AnalyticsPeriod, AnalyticsSnapshot, Breakdown, Metrics};
use rn_core::errors::DomainError;
use rn_core::repositories::AnalyticsRepository;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlAnalyticsRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, date, period, metrics, breakdown, created_at";

impl MySqlAnalyticsRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_snapshot(row: &sqlx::mysql::MySqlRow) -> Result<AnalyticsSnapshot, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let period: String = row.try_get("period").map_err(|e| column_err("period", e))?;
        let metrics: serde_json::Value = row
            .try_get("metrics")
            .map_err(|e| column_err("metrics", e))?;
        let metrics: Metrics =
            serde_json::from_value(metrics).map_err(|e| DomainError::Internal {
                message: format!("Invalid JSON in column metrics: {e}"),
            })?;
        let breakdown: serde_json::Value = row
            .try_get("breakdown")
            .map_err(|e| column_err("breakdown", e))?;
        let breakdown: Breakdown =
            serde_json::from_value(breakdown).map_err(|e| DomainError::Internal {
                message: format!("Invalid JSON in column breakdown: {e}"),
            })?;
        Ok(AnalyticsSnapshot {
            id: parse_uuid("id", &id)?,
            date: row
                .try_get::<NaiveDate, _>("date")
                .map_err(|e| column_err("date", e))?,
            period: parse_enum("period", &period, AnalyticsPeriod::parse)?,
            metrics,
            breakdown,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_err("created_at", e))?,
        })
    }
}

#[async_trait]
impl AnalyticsRepository for MySqlAnalyticsRepository {
    async fn upsert(
        &self,
        snapshot: AnalyticsSnapshot,
    ) -> Result<AnalyticsSnapshot, DomainError> {
        let metrics =
            serde_json::to_value(&snapshot.metrics).map_err(|e| DomainError::Internal {
                message: format!("Failed to encode metrics: {e}"),
            })?;
        let breakdown =
            serde_json::to_value(&snapshot.breakdown).map_err(|e| DomainError::Internal {
                message: format!("Failed to encode breakdown: {e}"),
            })?;
        let query = r#"
            INSERT INTO analytics_snapshots (id, date, period, metrics, breakdown, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                metrics = VALUES(metrics),
                breakdown = VALUES(breakdown),
                created_at = VALUES(created_at)
        "#;
        sqlx::query(query)
            .bind(snapshot.id.to_string())
            .bind(snapshot.date)
            .bind(snapshot.period.as_str())
            .bind(metrics)
            .bind(breakdown)
            .bind(snapshot.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to upsert analytics snapshot", e))?;
        Ok(snapshot)
    }

    async fn find_by_date_and_period(
        &self,
        date: NaiveDate,
        period: AnalyticsPeriod,
    ) -> Result<Option<AnalyticsSnapshot>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM analytics_snapshots WHERE date = ? AND period = ?");
        let row = sqlx::query(&query)
            .bind(date)
            .bind(period.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find analytics snapshot", e))?;
        row.as_ref().map(Self::row_to_snapshot).transpose()
    }

    async fn find_range(
        &self,
        period: AnalyticsPeriod,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AnalyticsSnapshot>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM analytics_snapshots \
             WHERE period = ? AND date BETWEEN ? AND ? \
             ORDER BY date ASC"
        );
        let rows = sqlx::query(&query)
            .bind(period.as_str())
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list analytics snapshots", e))?;
        rows.iter().map(Self::row_to_snapshot).collect()
    }

    async fn latest(
        &self,
        period: AnalyticsPeriod,
    ) -> Result<Option<AnalyticsSnapshot>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM analytics_snapshots WHERE period = ? \
             ORDER BY date DESC LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(period.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find latest analytics snapshot", e))?;
        row.as_ref().map(Self::row_to_snapshot).transpose()
    }
}
