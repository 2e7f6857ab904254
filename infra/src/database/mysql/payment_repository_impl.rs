//! MySQL implementation of the PaymentRepository trait.
//!
//! `mark_completed_if_pending` is the settlement commit point: a
//! conditional UPDATE guarded on `status = 'pending'` so that two worker
//! passes racing on the same payment settle it exactly once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use rn_core::domain::entities::{Payment, PaymentMethod, PaymentStatus};
use rn_core::errors::DomainError;
use rn_core::repositories::PaymentRepository;

use super::{column_err, db_err, parse_enum, parse_uuid};

pub struct MySqlPaymentRepository {
    pool: MySqlPool,
}

const COLUMNS: &str = "id, user_id, apartment_id, booking_id, amount, method, currency, \
                       status, transaction_id, refund_requested, refund_reason, \
                       refund_requested_at, refund_processed_at, paid_at, settle_after, \
                       created_at, updated_at";

impl MySqlPaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: &sqlx::mysql::MySqlRow) -> Result<Payment, DomainError> {
        let id: String = row.try_get("id").map_err(|e| column_err("id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| column_err("user_id", e))?;
        let apartment_id: String = row
            .try_get("apartment_id")
            .map_err(|e| column_err("apartment_id", e))?;
        let booking_id: Option<String> = row
            .try_get("booking_id")
            .map_err(|e| column_err("booking_id", e))?;
        let method: String = row.try_get("method").map_err(|e| column_err("method", e))?;
        let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
        Ok(Payment {
            id: parse_uuid("id", &id)?,
            user_id: parse_uuid("user_id", &user_id)?,
            apartment_id: parse_uuid("apartment_id", &apartment_id)?,
            booking_id: booking_id
                .as_deref()
                .map(|v| parse_uuid("booking_id", v))
                .transpose()?,
            amount: row.try_get("amount").map_err(|e| column_err("amount", e))?,
            method: parse_enum("method", &method, PaymentMethod::parse)?,
            currency: row
                .try_get("currency")
                .map_err(|e| column_err("currency", e))?,
            status: parse_enum("status", &status, PaymentStatus::parse)?,
            transaction_id: row
                .try_get("transaction_id")
                .map_err(|e| column_err("transaction_id", e))?,
            refund_requested: row
                .try_get("refund_requested")
                .map_err(|e| column_err("refund_requested", e))?,
            refund_reason: row
                .try_get("refund_reason")
                .map_err(|e| column_err("refund_reason", e))?,
            refund_requested_at: row
                .try_get::<Option<DateTime<Utc>>, _>("refund_requested_at")
                .map_err(|e| column_err("refund_requested_at", e))?,
            refund_processed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("refund_processed_at")
                .map_err(|e| column_err("refund_processed_at", e))?,
            paid_at: row
                .try_get::<Option<DateTime<Utc>>, _>("paid_at")
                .map_err(|e| column_err("paid_at", e))?,
            settle_after: row
                .try_get::<DateTime<Utc>, _>("settle_after")
                .map_err(|e| column_err("settle_after", e))?,
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
impl PaymentRepository for MySqlPaymentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find payment", e))?;
        row.as_ref().map(Self::row_to_payment).transpose()
    }

    async fn create(&self, payment: Payment) -> Result<Payment, DomainError> {
        let query = r#"
            INSERT INTO payments
                (id, user_id, apartment_id, booking_id, amount, method, currency,
                 status, transaction_id, refund_requested, refund_reason,
                 refund_requested_at, refund_processed_at, paid_at, settle_after,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;
        sqlx::query(query)
            .bind(payment.id.to_string())
            .bind(payment.user_id.to_string())
            .bind(payment.apartment_id.to_string())
            .bind(payment.booking_id.map(|id| id.to_string()))
            .bind(payment.amount)
            .bind(payment.method.as_str())
            .bind(&payment.currency)
            .bind(payment.status.as_str())
            .bind(&payment.transaction_id)
            .bind(payment.refund_requested)
            .bind(&payment.refund_reason)
            .bind(payment.refund_requested_at)
            .bind(payment.refund_processed_at)
            .bind(payment.paid_at)
            .bind(payment.settle_after)
            .bind(payment.created_at)
            .bind(payment.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DomainError::conflict("Duplicate transaction id")
                }
                e => db_err("Failed to create payment", e),
            })?;
        Ok(payment)
    }

    async fn update(&self, payment: Payment) -> Result<Payment, DomainError> {
        let query = r#"
            UPDATE payments
            SET status = ?, refund_requested = ?, refund_reason = ?,
                refund_requested_at = ?, refund_processed_at = ?, paid_at = ?,
                updated_at = ?
            WHERE id = ?
        "#;
        let result = sqlx::query(query)
            .bind(payment.status.as_str())
            .bind(payment.refund_requested)
            .bind(&payment.refund_reason)
            .bind(payment.refund_requested_at)
            .bind(payment.refund_processed_at)
            .bind(payment.paid_at)
            .bind(payment.updated_at)
            .bind(payment.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to update payment", e))?;
        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Payment"));
        }
        Ok(payment)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Payment>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM payments WHERE user_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list user payments", e))?;
        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>, DomainError> {
        let query =
            format!("SELECT {COLUMNS} FROM payments WHERE booking_id = ? ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .bind(booking_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list booking payments", e))?;
        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn find_all(&self) -> Result<Vec<Payment>, DomainError> {
        let query = format!("SELECT {COLUMNS} FROM payments ORDER BY created_at DESC");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list payments", e))?;
        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn find_refund_pending(&self) -> Result<Vec<Payment>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE status = 'refund_pending' \
             ORDER BY refund_requested_at ASC"
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list refund queue", e))?;
        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn find_due_pending(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Payment>, DomainError> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments \
             WHERE status = 'pending' AND settle_after <= ? \
             ORDER BY settle_after ASC LIMIT ?"
        );
        let rows = sqlx::query(&query)
            .bind(now)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list due payments", e))?;
        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn mark_completed_if_pending(
        &self,
        id: Uuid,
    ) -> Result<Option<Payment>, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE payments SET status = 'completed', paid_at = ?, updated_at = ? \
             WHERE id = ? AND status = 'pending'",
        )
        .bind(now)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to settle payment", e))?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) as total FROM payments")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count payments", e))?;
        let total: i64 = row.try_get("total").map_err(|e| column_err("total", e))?;
        Ok(total as u64)
    }
}
