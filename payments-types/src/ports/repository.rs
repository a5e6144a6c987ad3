//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) implement this trait.

use crate::domain::{Payment, PaymentId};
use crate::error::RepoError;

/// Durable storage for payment records.
///
/// Implementations enforce uniqueness of `transaction_id`.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Inserts a new payment. Fails with `Conflict` if the id or transaction id exists.
    async fn create(&self, payment: &Payment) -> Result<(), RepoError>;

    /// Gets a payment by ID. Fails with `NotFound` if absent.
    async fn find_by_id(&self, id: PaymentId) -> Result<Payment, RepoError>;

    /// Writes the mutable fields of an existing payment and refreshes `updated_at`
    /// on both the stored row and `payment`. Fails with `NotFound` if no row matches.
    async fn update(&self, payment: &mut Payment) -> Result<(), RepoError>;

    /// Lists payments, newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Payment>, RepoError>;
}
