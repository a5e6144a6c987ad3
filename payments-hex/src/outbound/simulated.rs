//! Simulated payment rail.
//!
//! Stands in for a real processor: accepts pending payments, declines a
//! configurable fraction of them at random, and refuses to cancel payments
//! that already reached `completed` or `canceled`.

use async_trait::async_trait;

use payments_types::{Payment, PaymentProcessor, PaymentStatus, ProcessorError};

/// In-process processor with a random decline rate.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProcessor {
    failure_rate: f64,
}

impl SimulatedProcessor {
    /// A processor that approves every valid request.
    pub fn new() -> Self {
        Self::default()
    }

    /// A processor that declines with probability `failure_rate` (clamped to `[0, 1]`).
    pub fn with_failure_rate(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self { failure_rate }
    }

    pub fn failure_rate(&self) -> f64 {
        self.failure_rate
    }

    fn rolls_decline(&self) -> bool {
        self.failure_rate > 0.0 && rand::random::<f64>() < self.failure_rate
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    #[tracing::instrument(skip(self, payment), fields(payment_id = %payment.id(), amount = payment.amount()))]
    async fn process(&self, payment: &Payment) -> Result<(), ProcessorError> {
        if payment.status() != PaymentStatus::Pending {
            return Err(ProcessorError::Declined(format!(
                "payment is {}, expected pending",
                payment.status()
            )));
        }

        if self.rolls_decline() {
            tracing::warn!("Simulated processor declined payment");
            return Err(ProcessorError::Declined("simulated decline".into()));
        }

        tracing::info!(
            transaction_id = payment.transaction_id(),
            "Simulated processor accepted payment"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self, payment), fields(payment_id = %payment.id()))]
    async fn cancel(&self, payment: &Payment) -> Result<(), ProcessorError> {
        match payment.status() {
            PaymentStatus::Completed | PaymentStatus::Canceled => {
                Err(ProcessorError::Declined(format!(
                    "cannot cancel a {} payment",
                    payment.status()
                )))
            }
            _ => {
                tracing::info!("Simulated processor canceled payment");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payments_types::{Currency, PaymentMetadata, PaymentMethod};

    fn pending_payment() -> Payment {
        Payment::new(
            2500,
            Currency::USD,
            String::new(),
            "cus_sim".to_string(),
            "PAY_20240101000000_aaaaaaaaaaaaaaaa".to_string(),
            PaymentMetadata {
                order_id: String::new(),
                product_id: String::new(),
                payment_method: PaymentMethod::BankTransfer,
            },
        )
    }

    #[tokio::test]
    async fn test_default_processor_accepts() {
        let processor = SimulatedProcessor::new();
        assert!(processor.process(&pending_payment()).await.is_ok());
    }

    #[tokio::test]
    async fn test_full_failure_rate_declines() {
        let processor = SimulatedProcessor::with_failure_rate(1.0);
        let result = processor.process(&pending_payment()).await;
        assert!(matches!(result, Err(ProcessorError::Declined(_))));
    }

    #[tokio::test]
    async fn test_rejects_non_pending_payment() {
        let mut payment = pending_payment();
        payment.transition_to(PaymentStatus::Canceled).unwrap();

        let processor = SimulatedProcessor::new();

        assert!(processor.process(&payment).await.is_err());
        assert!(processor.cancel(&payment).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_pending() {
        let processor = SimulatedProcessor::new();
        assert!(processor.cancel(&pending_payment()).await.is_ok());
    }

    #[test]
    fn test_failure_rate_is_clamped() {
        assert_eq!(SimulatedProcessor::with_failure_rate(3.0).failure_rate(), 1.0);
        assert_eq!(SimulatedProcessor::with_failure_rate(-1.0).failure_rate(), 0.0);
        assert_eq!(SimulatedProcessor::with_failure_rate(f64::NAN).failure_rate(), 0.0);
    }
}
