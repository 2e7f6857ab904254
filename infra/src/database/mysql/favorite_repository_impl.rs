//! MySQL implementation of the FavoriteRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::Favorite;
use rn_core::errors::DomainError;
use rn_core::repositories::FavoriteRepository;

use super::{column_err, db_err, parse_uuid};

pub struct MySqlFavoriteRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, apartment_id, notes, tags, created_at, updated_at";

impl MySqlFavoriteRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_favorite(row: &sqlx::mysql::MySqlRow) -> Result<Favorite, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let apartment_id: String = row
            .try_get("apartment_id")
            .map_err(|e| column_err("apartment_id", e))?;
        let tags: serde_json::Value = row.try_get("tags").map_err(|e| column_err("tags", e))?;
        let tags: Vec<String> = serde_json::from_value(tags).map_err(|e| {
            DomainError::Internal {
                message: format!("Invalid JSON in column tags: {e}"),
            }
        })?;
        Ok(Favorite {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            apartment_id: parse_uuid("apartment_id", &apartment_id)?,
            notes: row.try_get("notes").map_err(|e| column_err("notes", e))?,
            tags,
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
impl FavoriteRepository for MySqlFavoriteRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Favorite>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM favorites WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find favorite", e))?;
        row.as_ref().map(Self::row_to_favorite).transpose()
    }

    async fn create(&self, favorite: Favorite) -> Result<Favorite, DomainError> {
        let tags = serde_json::to_value(&favorite.tags).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode tags: {e}"),
        })?;
        let query = r#"
            INSERT INTO favorites (id, user_id, apartment_id, notes, tags, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(favorite.id.to_string())
            .bind(favorite.user_id.to_string())
            .bind(favorite.apartment_id.to_string())
            .bind(&favorite.notes)
            .bind(tags)
            .bind(favorite.created_at)
            .bind(favorite.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::conflict("Apartment is already in favorites")
                }
                e => db_err("Failed to create favorite", e),
            })?;
        Ok(favorite)
    }

    async fn update(&self, favorite: Favorite) -> Result<Favorite, DomainError> {
        let tags = serde_json::to_value(&favorite.tags).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode tags: {e}"),
        })?;
        let result = sqlx::query(
            "UPDATE favorites SET notes = ?, tags = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&favorite.notes)
        .bind(tags)
        .bind(favorite.updated_at)
        .bind(favorite.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update favorite", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Favorite"));
        }
        Ok(favorite)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete favorite", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Favorite>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM favorites WHERE user_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list favorites", e))?;
        rows.iter().map(Self::row_to_favorite).collect()
    }

    async fn find_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Favorite>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM favorites WHERE user_id = ? AND apartment_id = ? LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(apartment_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find favorite", e))?;
        row.as_ref().map(Self::row_to_favorite).transpose()
    }

    async fn delete_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND apartment_id = ?")
            .bind(user_id.to_string())
            .bind(apartment_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete favorite", e))?;
        Ok(result.rows_affected() > 0)
    }
}
