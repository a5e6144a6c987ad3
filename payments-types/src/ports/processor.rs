//! Payment processor port.
//!
//! The processor executes or cancels a payment against an external rail.
//! Outcomes are binary: `Ok` or an error.

use crate::domain::Payment;

/// Error type for processor operations.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("Payment declined: {0}")]
    Declined(String),

    #[error("Processor unavailable: {0}")]
    Unavailable(String),
}

/// Port trait for payment processors.
#[async_trait::async_trait]
pub trait PaymentProcessor: Send + Sync + 'static {
    /// Executes the payment.
    async fn process(&self, payment: &Payment) -> Result<(), ProcessorError>;

    /// Cancels the payment.
    async fn cancel(&self, payment: &Payment) -> Result<(), ProcessorError>;
}
