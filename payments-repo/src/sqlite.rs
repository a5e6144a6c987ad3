//! SQLite repository adapter.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that ordering by the TEXT column matches ordering by time.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use payments_types::{Payment, PaymentId, PaymentRepository, RepoError};

use crate::types::SqlitePaymentRow;
use crate::{map_db_error, migration_statements};

const SELECT_COLUMNS: &str = "SELECT id, amount, currency, status, description, customer_id, \
     transaction_id, metadata, created_at, updated_at FROM payments";

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!("SQLite schema ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema. Safe to run more than once.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        for stmt in migration_statements(include_str!("../migrations/0001_create_payments.sql")) {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn create(&self, payment: &Payment) -> Result<(), RepoError> {
        let metadata = serde_json::to_string(payment.metadata())
            .map_err(|e| RepoError::Database(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO payments
               (id, amount, currency, status, description, customer_id, transaction_id,
                metadata, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(payment.id().to_string())
        .bind(payment.amount())
        .bind(payment.currency().code())
        .bind(payment.status().as_str())
        .bind(payment.description())
        .bind(payment.customer_id())
        .bind(payment.transaction_id())
        .bind(metadata)
        .bind(format_timestamp(payment.created_at()))
        .bind(format_timestamp(payment.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Payment, RepoError> {
        let row: Option<SqlitePaymentRow> =
            sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn update(&self, payment: &mut Payment) -> Result<(), RepoError> {
        payment.touch();
        let metadata = serde_json::to_string(payment.metadata())
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let result = sqlx::query(
            r#"UPDATE payments
               SET status = ?, description = ?, metadata = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(payment.status().as_str())
        .bind(payment.description())
        .bind(metadata)
        .bind(format_timestamp(payment.updated_at()))
        .bind(payment.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<SqlitePaymentRow> = sqlx::query_as(&format!(
            "{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(SqlitePaymentRow::into_domain).collect()
    }
}
