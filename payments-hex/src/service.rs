//! Payment Application Service
//!
//! Orchestrates validation, transaction-id generation, persistence and
//! processing through the repository and processor ports.
//! Contains NO infrastructure logic - pure business orchestration.

use payments_types::{
    AppError, CreatePaymentRequest, Currency, DomainError, Payment, PaymentId, PaymentMetadata,
    PaymentMethod, PaymentProcessor, PaymentRepository, PaymentStatus,
    PrefixedTransactionIdGenerator, TransactionIdGenerator,
};

use crate::validation::validate_create_input;

/// Page size used when the caller asks for zero or fewer payments.
pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// Application service for payment operations.
///
/// Generic over the repository and processor ports - adapters are injected at
/// compile time. The transaction-id generator is swappable for tests.
pub struct PaymentService<R: PaymentRepository, P: PaymentProcessor> {
    repo: R,
    processor: P,
    generator: Box<dyn TransactionIdGenerator>,
}

impl<R: PaymentRepository, P: PaymentProcessor> PaymentService<R, P> {
    /// Creates a new payment service using the `PAY` transaction-id generator.
    pub fn new(repo: R, processor: P) -> Self {
        Self::with_generator(repo, processor, PrefixedTransactionIdGenerator::payments())
    }

    /// Creates a payment service with a custom transaction-id generator.
    pub fn with_generator(
        repo: R,
        processor: P,
        generator: impl TransactionIdGenerator + 'static,
    ) -> Self {
        Self {
            repo,
            processor,
            generator: Box::new(generator),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the underlying processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Creates a payment: validate, assign a transaction id, persist, process.
    ///
    /// The returned payment is `pending`. A processor failure after the record
    /// is stored surfaces as `Internal` and leaves the stored record `pending`.
    #[tracing::instrument(skip(self, req), fields(amount = req.amount, currency = %req.currency))]
    pub async fn create_payment(&self, req: CreatePaymentRequest) -> Result<Payment, AppError> {
        tracing::info!("Creating payment");

        if let Err(e) = validate_create_input(&req) {
            tracing::warn!(error = %e, "Payment validation failed");
            return Err(e.into());
        }

        let currency: Currency = req
            .currency
            .parse()
            .map_err(|_| DomainError::Validation("unsupported currency".into()))?;
        let payment_method: PaymentMethod = req
            .payment_method
            .parse()
            .map_err(|_| DomainError::Validation("unsupported payment_method".into()))?;

        let transaction_id = self.generator.generate().map_err(|e| {
            tracing::error!(error = %e, "Failed to generate transaction ID");
            AppError::internal(e)
        })?;
        tracing::debug!(%transaction_id, "Generated transaction ID");

        let payment = Payment::new(
            req.amount,
            currency,
            req.description,
            req.customer_id,
            transaction_id,
            PaymentMetadata {
                order_id: req.order_id,
                product_id: req.product_id,
                payment_method,
            },
        );

        self.repo.create(&payment).await.map_err(|e| {
            tracing::error!(error = %e, payment_id = %payment.id(), "Failed to store payment");
            AppError::internal(e)
        })?;

        // No rollback: a failed process call leaves the stored record pending.
        self.processor.process(&payment).await.map_err(|e| {
            tracing::error!(error = %e, payment_id = %payment.id(), "Payment processing failed");
            AppError::internal(e)
        })?;

        tracing::info!(payment_id = %payment.id(), "Payment created");
        Ok(payment)
    }

    /// Gets a payment by ID.
    #[tracing::instrument(skip(self), fields(payment_id = %id))]
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.repo.find_by_id(id).await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to find payment");
            AppError::from(e)
        })
    }

    /// Lists payments, newest first.
    ///
    /// `limit <= 0` becomes [`DEFAULT_LIST_LIMIT`]; a negative offset becomes 0.
    #[tracing::instrument(skip(self))]
    pub async fn list_payments(&self, limit: i64, offset: i64) -> Result<Vec<Payment>, AppError> {
        let limit = if limit <= 0 {
            tracing::debug!("Using default limit value: {}", DEFAULT_LIST_LIMIT);
            DEFAULT_LIST_LIMIT
        } else {
            limit
        };
        let offset = if offset < 0 {
            tracing::debug!("Adjusting negative offset to 0");
            0
        } else {
            offset
        };

        let payments = self.repo.list(limit, offset).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list payments");
            AppError::internal(e)
        })?;

        tracing::info!("Retrieved {} payments", payments.len());
        Ok(payments)
    }

    /// Cancels a pending payment.
    ///
    /// The processor is asked first; the stored status only changes once it agrees.
    #[tracing::instrument(skip(self), fields(payment_id = %id))]
    pub async fn cancel_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        let mut payment = self.get_payment(id).await?;

        if !payment.status().can_transition_to(PaymentStatus::Canceled) {
            return Err(AppError::Validation(format!(
                "payment cannot be canceled in status {}",
                payment.status()
            )));
        }

        self.processor.cancel(&payment).await.map_err(|e| {
            tracing::error!(error = %e, "Processor refused cancellation");
            AppError::internal(e)
        })?;

        payment.transition_to(PaymentStatus::Canceled)?;

        self.repo.update(&mut payment).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to store canceled payment");
            AppError::internal(e)
        })?;

        tracing::info!("Payment canceled");
        Ok(payment)
    }
}
