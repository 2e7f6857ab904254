//! MySQL implementation of the ReviewRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::Review;
use rn_core::errors::DomainError;
use rn_core::repositories::ReviewRepository;

use super::{column_err, db_err, parse_uuid};

pub struct MySqlReviewRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, apartment_id, agent_id, rating, comment, \
                       agent_response, responded_at, created_at, updated_at";

impl MySqlReviewRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_review(row: &sqlx::mysql::MySqlRow) -> Result<Review, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let apartment_id: String = row
            .try_get("apartment_id")
            .map_err(|e| column_err("apartment_id", e))?;
        let agent_id: String = row
            .try_get("agent_id")
            .map_err(|e| column_err("agent_id", e))?;
        Ok(Review {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            apartment_id: parse_uuid("apartment_id", &apartment_id)?,
            agent_id: parse_uuid("agent_id", &agent_id)?,
            rating: row
                .try_get::<u8, _>("rating")
                .map_err(|e| column_err("rating", e))?,
            comment: row
                .try_get("comment")
                .map_err(|e| column_err("comment", e))?,
            agent_response: row
                .try_get("agent_response")
                .map_err(|e| column_err("agent_response", e))?,
            responded_at: row
                .try_get::<Option<DateTime<Utc>>, _>("responded_at")
                .map_err(|e| column_err("responded_at", e))?,
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
impl ReviewRepository for MySqlReviewRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find review", e))?;
        row.as_ref().map(Self::row_to_review).transpose()
    }

    async fn create(&self, review: Review) -> Result<Review, DomainError> {
        let query = r#"
            INSERT INTO reviews
                (id, user_id, apartment_id, agent_id, rating, comment,
                 agent_response, responded_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(review.id.to_string())
            .bind(review.user_id.to_string())
            .bind(review.apartment_id.to_string())
            .bind(review.agent_id.to_string())
            .bind(review.rating)
            .bind(&review.comment)
            .bind(&review.agent_response)
            .bind(review.responded_at)
            .bind(review.created_at)
            .bind(review.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::conflict("You have already reviewed this apartment")
                }
                e => db_err("Failed to create review", e),
            })?;
        Ok(review)
    }

    async fn update(&self, review: Review) -> Result<Review, DomainError> {
        let query = r#"
            UPDATE reviews
            SET rating = ?, comment = ?, agent_response = ?, responded_at = ?, updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(review.rating)
            .bind(&review.comment)
            .bind(&review.agent_response)
            .bind(review.responded_at)
            .bind(review.updated_at)
            .bind(review.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update review", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Review"));
        }
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete review", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_apartment(&self, apartment_id: Uuid) -> Result<Vec<Review>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE apartment_id = ? ORDER BY created_at DESC"
        );
        let rows = sqlx::query(&query)
            .bind(apartment_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list apartment reviews", e))?;
        rows.iter().map(Self::row_to_review).collect()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Review>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE user_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list user reviews", e))?;
        rows.iter().map(Self::row_to_review).collect()
    }

    async fn find_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Review>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE user_id = ? AND apartment_id = ? LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(apartment_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find review", e))?;
        row.as_ref().map(Self::row_to_review).transpose()
    }

    async fn ratings_for_apartment(&self, apartment_id: Uuid) -> Result<Vec<u8>, DomainError> {
        let rows = sqlx::query("SELECT rating FROM reviews WHERE apartment_id = ?")
            .bind(apartment_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list apartment ratings", e))?;
        rows.iter()
            .map(|row| {
                row.try_get::<u8, _>("rating")
                    .map_err(|e| column_err("rating", e))
            })
            .collect()
    }

    async fn find_all(&self) -> Result<Vec<Review>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM reviews ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list reviews", e))?;
        rows.iter().map(Self::row_to_review).collect()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM reviews")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count reviews", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }
}
