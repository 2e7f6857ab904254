//! MySQL implementation of the AdminRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::Admin;
use rn_core::errors::DomainError;
use rn_core::repositories::AdminRepository;

use super::{column_err, db_err, parse_uuid};

pub struct MySqlAdminRepository {
    pool: MySqlPool,
}

impl MySqlAdminRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_admin(row: &sqlx::mysql::MySqlRow) -> Result<Admin, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        Ok(Admin {
            id: parse_uuid("id", &id)?,
            name: row.try_get("name").map_err(|e| column_err("name", e))?,
            email: row.try_get("email").map_err(|e| column_err("email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| column_err("password_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
        })
    }
}

const COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

#[async_trait]
impl AdminRepository for MySqlAdminRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find admin", e))?;
        row.as_ref().map(Self::row_to_admin).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE email = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find admin by email", e))?;
        row.as_ref().map(Self::row_to_admin).transpose()
    }

    async fn create(&self, admin: Admin) -> Result<Admin, DomainError> {
        let query = r#"
            INSERT INTO admins (id, name, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(admin.id.to_string())
            .bind(&admin.name)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.created_at)
            .bind(admin.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::conflict("Email already registered")
                }
                e => db_err("Failed to create admin", e),
            })?;
        Ok(admin)
    }
}
