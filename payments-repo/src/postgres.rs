//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use payments_types::{Payment, PaymentId, PaymentRepository, RepoError};

use crate::types::PgPaymentRow;
use crate::{map_db_error, migration_statements};

const SELECT_COLUMNS: &str = "SELECT id, amount, currency, status, description, customer_id, \
     transaction_id, metadata, created_at, updated_at FROM payments";

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for stmt in migration_statements(sql) {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_payments_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        tracing::debug!("PostgreSQL schema ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PaymentRepository for PostgresRepo {
    async fn create(&self, payment: &Payment) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO payments
               (id, amount, currency, status, description, customer_id, transaction_id,
                metadata, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(payment.id().into_uuid())
        .bind(payment.amount())
        .bind(payment.currency().code())
        .bind(payment.status().as_str())
        .bind(payment.description())
        .bind(payment.customer_id())
        .bind(payment.transaction_id())
        .bind(Json(payment.metadata()))
        .bind(payment.created_at())
        .bind(payment.updated_at())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Payment, RepoError> {
        let row: Option<PgPaymentRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.into_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.ok_or(RepoError::NotFound)?.into_domain()
    }

    async fn update(&self, payment: &mut Payment) -> Result<(), RepoError> {
        payment.touch();

        let result = sqlx::query(
            r#"UPDATE payments
               SET status = $1, description = $2, metadata = $3, updated_at = $4
               WHERE id = $5"#,
        )
        .bind(payment.status().as_str())
        .bind(payment.description())
        .bind(Json(payment.metadata()))
        .bind(payment.updated_at())
        .bind(payment.id().into_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<PgPaymentRow> = sqlx::query_as(&format!(
            "{} ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(PgPaymentRow::into_domain).collect()
    }
}
