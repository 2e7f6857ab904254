//! MySQL implementation of the AgentRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{Agent, AgentStatus};
use rn_core::errors::DomainError;
use rn_core::repositories::AgentRepository;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlAgentRepository {
    pool: MySqlPool,
}

impl MySqlAgentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_agent(row: &sqlx::mysql::MySqlRow) -> Result<Agent, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
        Ok(Agent {
            id: parse_uuid("id", &id)?,
            name: row.try_get("name").map_err(|e| column_err("name", e))?,
            email: row.try_get("email").map_err(|e| column_err("email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| column_err("password_hash", e))?,
            phone: row.try_get("phone").map_err(|e| column_err("phone", e))?,
            certificate: row
                .try_get("certificate")
                .map_err(|e| column_err("certificate", e))?,
            status: parse_enum("status", &status, AgentStatus::parse)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
        })
    }
}

const COLUMNS: &str =
    "id, name, email, password_hash, phone, certificate, status, created_at, updated_at";

#[async_trait]
impl AgentRepository for MySqlAgentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Agent>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM agents WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find agent", e))?;
        row.as_ref().map(Self::row_to_agent).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Agent>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM agents WHERE email = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find agent by email", e))?;
        row.as_ref().map(Self::row_to_agent).transpose()
    }

    async fn create(&self, agent: Agent) -> Result<Agent, DomainError> {
        let query = r#"
            INSERT INTO agents (id, name, email, password_hash, phone, certificate, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(agent.id.to_string())
            .bind(&agent.name)
            .bind(&agent.email)
            .bind(&agent.password_hash)
            .bind(&agent.phone)
            .bind(&agent.certificate)
            .bind(agent.status.as_str())
            .bind(agent.created_at)
            .bind(agent.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::conflict("Email already registered")
                }
                e => db_err("Failed to create agent", e),
            })?;
        Ok(agent)
    }

    async fn update(&self, agent: Agent) -> Result<Agent, DomainError> {
        let query = r#"
            UPDATE agents
            SET name = ?, email = ?, password_hash = ?, phone = ?, certificate = ?, status = ?, updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(&agent.name)
            .bind(&agent.email)
            .bind(&agent.password_hash)
            .bind(&agent.phone)
            .bind(&agent.certificate)
            .bind(agent.status.as_str())
            .bind(agent.updated_at)
            .bind(agent.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update agent", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Agent"));
        }
        Ok(agent)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete agent", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_all(&self) -> Result<Vec<Agent>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM agents ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list agents", e))?;
        rows.iter().map(Self::row_to_agent).collect()
    }

    async fn find_by_status(&self, status: AgentStatus) -> Result<Vec<Agent>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM agents WHERE status = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(status.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list agents by status", e))?;
        rows.iter().map(Self::row_to_agent).collect()
    }

    async fn count_by_status(&self, status: AgentStatus) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM agents WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count agents", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM agents")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count agents", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }
}
