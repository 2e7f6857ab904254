//! MySQL implementation of the ApartmentRepository trait.
//!
//! `claim_availability` and `release_availability` are single conditional
//! UPDATE statements; the affected-row count is what decides the winner of
//! a booking race, so no transaction or row lock is needed around them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::{MySql, MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{Apartment, ApartmentCategory};
use rn_core::errors::DomainError;
use rn_core::repositories::{ApartmentFilter, ApartmentRepository};
use rn_shared::types::Pagination;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlApartmentRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, agent_id, location, price, category, description, images, \
                       availability, average_rating, total_reviews, created_at, updated_at";

impl MySqlApartmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_apartment(row: &sqlx::mysql::MySqlRow) -> Result<Apartment, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let agent_id: String = row
            .try_get("agent_id")
            .map_err(|e| column_err("agent_id", e))?;
        let category: String = row
            .try_get("category")
            .map_err(|e| column_err("category", e))?;
        let images: serde_json::Value = row
            .try_get("images")
            .map_err(|e| column_err("images", e))?;
        let images: Vec<String> =
            serde_json::from_value(images).map_err(|e| DomainError::Internal {
                message: format!("Invalid JSON in column images: {e}"),
            })?;
        let total_reviews: u32 = row
            .try_get("total_reviews")
            .map_err(|e| column_err("total_reviews", e))?;
        Ok(Apartment {
            id: parse_uuid("id", &id)?,
            agent_id: parse_uuid("agent_id", &agent_id)?,
            location: row
                .try_get("location")
                .map_err(|e| column_err("location", e))?,
            price: row.try_get("price").map_err(|e| column_err("price", e))?,
            category: parse_enum("category", &category, ApartmentCategory::parse)?,
            description: row
                .try_get("description")
                .map_err(|e| column_err("description", e))?,
            images,
            availability: row
                .try_get("availability")
                .map_err(|e| column_err("availability", e))?,
            average_rating: row
                .try_get("average_rating")
                .map_err(|e| column_err("average_rating", e))?,
            total_reviews,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| column_err("updated_at", e))?,
        })
    }

    /// WHERE clauses for `filter`, in the same order `bind_filter` binds them
    fn filter_conditions(filter: &ApartmentFilter) -> Vec<&'static str> {
        let mut conditions = Vec::new();
        if filter.location.is_some() {
            conditions.push("LOWER(location) LIKE ?");
        }
        if filter.category.is_some() {
            conditions.push("category = ?");
        }
        if filter.min_price.is_some() {
            conditions.push("price >= ?");
        }
        if filter.max_price.is_some() {
            conditions.push("price <= ?");
        }
        if filter.available.is_some() {
            conditions.push("availability = ?");
        }
        if filter.search.is_some() {
            conditions.push("(LOWER(location) LIKE ? OR LOWER(description) LIKE ?)");
        }
        conditions
    }

    fn bind_filter<'q>(
        mut query: Query<'q, MySql, MySqlArguments>,
        filter: &'q ApartmentFilter,
    ) -> Query<'q, MySql, MySqlArguments> {
        if let Some(location) = &filter.location {
            query = query.bind(format!("%{}%", location.to_lowercase()));
        }
        if let Some(category) = filter.category {
            query = query.bind(category.as_str());
        }
        if let Some(min_price) = filter.min_price {
            query = query.bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            query = query.bind(max_price);
        }
        if let Some(available) = filter.available {
            query = query.bind(available);
        }
        if let Some(search) = &filter.search {
            let needle = format!("%{}%", search.to_lowercase());
            query = query.bind(needle.clone()).bind(needle);
        }
        query
    }

    fn where_clause(conditions: &[&str]) -> String {
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }
}

#[async_trait]
impl ApartmentRepository for MySqlApartmentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Apartment>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM apartments WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find apartment", e))?;
        row.as_ref().map(Self::row_to_apartment).transpose()
    }

    async fn create(&self, apartment: Apartment) -> Result<Apartment, DomainError> {
        let images = serde_json::to_value(&apartment.images).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to encode images: {e}"),
            }
        })?;
        let query = r#"
            INSERT INTO apartments
                (id, agent_id, location, price, category, description, images,
                 availability, average_rating, total_reviews, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(apartment.id.to_string())
            .bind(apartment.agent_id.to_string())
            .bind(&apartment.location)
            .bind(apartment.price)
            .bind(apartment.category.as_str())
            .bind(&apartment.description)
            .bind(images)
            .bind(apartment.availability)
            .bind(apartment.average_rating)
            .bind(apartment.total_reviews)
            .bind(apartment.created_at)
            .bind(apartment.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to create apartment", e))?;
        Ok(apartment)
    }

    async fn update(&self, apartment: Apartment) -> Result<Apartment, DomainError> {
        let images = serde_json::to_value(&apartment.images).map_err(|e| {
            DomainError::Internal {
                message: format!("Failed to encode images: {e}"),
            }
        })?;
        let query = r#"
            UPDATE apartments
            SET location = ?, price = ?, category = ?, description = ?, images = ?,
                availability = ?, updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(&apartment.location)
            .bind(apartment.price)
            .bind(apartment.category.as_str())
            .bind(&apartment.description)
            .bind(images)
            .bind(apartment.availability)
            .bind(apartment.updated_at)
            .bind(apartment.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update apartment", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Apartment"));
        }
        Ok(apartment)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM apartments WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete apartment", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_filtered(
        &self,
        filter: &ApartmentFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Apartment>, DomainError> {
        let conditions = Self::filter_conditions(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM apartments{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            Self::where_clause(&conditions)
        );
        let rows = Self::bind_filter(sqlx::query(&query), filter)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list apartments", e))?;
        rows.iter().map(Self::row_to_apartment).collect()
    }

    async fn count_filtered(&self, filter: &ApartmentFilter) -> Result<u64, DomainError> {
        let conditions = Self::filter_conditions(filter);
        let query = format!(
            "SELECT COUNT(*) as total FROM apartments{}",
            Self::where_clause(&conditions)
        );
        let row = Self::bind_filter(sqlx::query(&query), filter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count apartments", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn find_by_agent(&self, agent_id: Uuid) -> Result<Vec<Apartment>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM apartments WHERE agent_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(agent_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list agent apartments", e))?;
        rows.iter().map(Self::row_to_apartment).collect()
    }

    async fn claim_availability(&self, id: Uuid) -> Result<bool, DomainError> {
        // Conditional flip; rows_affected is 0 for every caller but the winner.
        let result = sqlx::query(
            "UPDATE apartments SET availability = FALSE, updated_at = ? \
             WHERE id = ? AND availability = TRUE",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to claim apartment availability", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn release_availability(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE apartments SET availability = TRUE, updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to release apartment availability", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: u32,
    ) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE apartments SET average_rating = ?, total_reviews = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(average_rating)
        .bind(total_reviews)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update apartment rating", e))?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM apartments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count apartments", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn count_available(&self) -> Result<u64, DomainError> {
        let row =
            sqlx::query("SELECT COUNT(*) as total FROM apartments WHERE availability = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_err("Failed to count available apartments", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn find_all(&self) -> Result<Vec<Apartment>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM apartments ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list apartments", e))?;
        rows.iter().map(Self::row_to_apartment).collect()
    }
}
