//! Database row structs and their conversion into domain payments.

use sqlx::FromRow;

use payments_types::{Currency, PaymentStatus, RepoError};

fn corrupt(column: &str, err: impl std::fmt::Display) -> RepoError {
    RepoError::Database(format!("invalid {} in stored payment: {}", column, err))
}

fn parse_currency(raw: &str) -> Result<Currency, RepoError> {
    raw.parse().map_err(|e| corrupt("currency", e))
}

fn parse_status(raw: &str) -> Result<PaymentStatus, RepoError> {
    raw.parse().map_err(|e| corrupt("status", e))
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite: ids, metadata and timestamps are stored as TEXT
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub use self::sqlite_row::SqlitePaymentRow;

#[cfg(feature = "sqlite")]
mod sqlite_row {
    use chrono::{DateTime, Utc};
    use payments_types::{Payment, PaymentId, PaymentMetadata, RepoError};

    use super::*;

    /// Payment row from SQLite.
    #[derive(FromRow)]
    pub struct SqlitePaymentRow {
        pub id: String,
        pub amount: i64,
        pub currency: String,
        pub status: String,
        pub description: String,
        pub customer_id: String,
        pub transaction_id: String,
        pub metadata: String,
        pub created_at: String,
        pub updated_at: String,
    }

    fn parse_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, RepoError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| corrupt(column, e))
    }

    impl SqlitePaymentRow {
        pub fn into_domain(self) -> Result<Payment, RepoError> {
            let id: PaymentId = self.id.parse().map_err(|e| corrupt("id", e))?;
            let metadata: PaymentMetadata =
                serde_json::from_str(&self.metadata).map_err(|e| corrupt("metadata", e))?;

            Ok(Payment::from_parts(
                id,
                self.amount,
                parse_currency(&self.currency)?,
                parse_status(&self.status)?,
                self.description,
                self.customer_id,
                self.transaction_id,
                metadata,
                parse_timestamp("created_at", &self.created_at)?,
                parse_timestamp("updated_at", &self.updated_at)?,
            ))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL: native UUID, JSONB and TIMESTAMPTZ columns
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
pub use self::pg_row::PgPaymentRow;

#[cfg(feature = "postgres")]
mod pg_row {
    use chrono::{DateTime, Utc};
    use payments_types::{Payment, PaymentId, PaymentMetadata, RepoError};
    use sqlx::types::Json;
    use uuid::Uuid;

    use super::*;

    /// Payment row from PostgreSQL.
    #[derive(FromRow)]
    pub struct PgPaymentRow {
        pub id: Uuid,
        pub amount: i64,
        pub currency: String,
        pub status: String,
        pub description: String,
        pub customer_id: String,
        pub transaction_id: String,
        pub metadata: Json<PaymentMetadata>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl PgPaymentRow {
        pub fn into_domain(self) -> Result<Payment, RepoError> {
            Ok(Payment::from_parts(
                PaymentId::from_uuid(self.id),
                self.amount,
                parse_currency(&self.currency)?,
                parse_status(&self.status)?,
                self.description,
                self.customer_id,
                self.transaction_id,
                self.metadata.0,
                self.created_at,
                self.updated_at,
            ))
        }
    }
}
