//! MySQL implementation of the BookingRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{Booking, BookingPaymentStatus, BookingStatus};
use rn_core::errors::DomainError;
use rn_core::repositories::BookingRepository;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlBookingRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, apartment_id, status, payment_status, \
                       check_in_date, check_out_date, created_at, updated_at";

impl MySqlBookingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_booking(row: &sqlx::mysql::MySqlRow) -> Result<Booking, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let apartment_id: String = row
            .try_get("apartment_id")
            .map_err(|e| column_err("apartment_id", e))?;
        let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
        let payment_status: String = row
            .try_get("payment_status")
            .map_err(|e| column_err("payment_status", e))?;
        Ok(Booking {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            apartment_id: parse_uuid("apartment_id", &apartment_id)?,
            status: parse_enum("status", &status, BookingStatus::parse)?,
            payment_status: parse_enum(
                "payment_status",
                &payment_status,
                BookingPaymentStatus::parse,
            )?,
            check_in_date: row
                .try_get::<Option<DateTime<Utc>>, _>("check_in_date")
                .map_err(|e| column_err("check_in_date", e))?,
            check_out_date: row
                .try_get::<Option<DateTime<Utc>>, _>("check_out_date")
                .map_err(|e| column_err("check_out_date", e))?,
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
impl BookingRepository for MySqlBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find booking", e))?;
        row.as_ref().map(Self::row_to_booking).transpose()
    }

    async fn create(&self, booking: Booking) -> Result<Booking, DomainError> {
        let query = r#"
            INSERT INTO bookings
                (id, user_id, apartment_id, status, payment_status,
                 check_in_date, check_out_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(booking.id.to_string())
            .bind(booking.user_id.to_string())
            .bind(booking.apartment_id.to_string())
            .bind(booking.status.as_str())
            .bind(booking.payment_status.as_str())
            .bind(booking.check_in_date)
            .bind(booking.check_out_date)
            .bind(booking.created_at)
            .bind(booking.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to create booking", e))?;
        Ok(booking)
    }

    async fn update(&self, booking: Booking) -> Result<Booking, DomainError> {
        let query = r#"
            UPDATE bookings
            SET status = ?, payment_status = ?, check_in_date = ?, check_out_date = ?,
                updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(booking.status.as_str())
            .bind(booking.payment_status.as_str())
            .bind(booking.check_in_date)
            .bind(booking.check_out_date)
            .bind(booking.updated_at)
            .bind(booking.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update booking", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Booking"));
        }
        Ok(booking)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete booking", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM bookings WHERE user_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list user bookings", e))?;
        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn find_by_apartments(
        &self,
        apartment_ids: &[Uuid],
    ) -> Result<Vec<Booking>, DomainError> {
        if apartment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; apartment_ids.len()].join(", ");
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE apartment_id IN ({placeholders}) \
             ORDER BY created_at DESC"
        );
        let mut q = sqlx::query(&query);
        for id in apartment_ids {
            q = q.bind(id.to_string());
        }
        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list apartment bookings", e))?;
        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn find_active_by_user_and_apartment(
        &self,
        user_id: Uuid,
        apartment_id: Uuid,
    ) -> Result<Option<Booking>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE user_id = ? AND apartment_id = ? AND status IN ('pending', 'approved') \
             LIMIT 1"
        );
        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(apartment_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find active booking", e))?;
        row.as_ref().map(Self::row_to_booking).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Booking>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM bookings ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list bookings", e))?;
        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn count_by_status(&self, status: BookingStatus) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM bookings WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count bookings", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count bookings", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }
}
