//! Payment domain model.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::currency::{Currency, PaymentMethod};
use super::status::PaymentStatus;
use crate::error::DomainError;

/// Unique identifier for a Payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random PaymentId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a PaymentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Order context attached to a payment. Stored as a nested JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentMetadata {
    #[serde(default)]
    #[schema(example = "order-1001")]
    pub order_id: String,
    #[serde(default)]
    #[schema(example = "sku-42")]
    pub product_id: String,
    pub payment_method: PaymentMethod,
}

/// A payment record.
///
/// `amount`, `currency`, `transaction_id` and `created_at` have no mutators;
/// `status` only moves through [`Payment::transition_to`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    id: PaymentId,
    /// Amount in the smallest currency unit
    #[schema(example = 5000)]
    amount: i64,
    currency: Currency,
    status: PaymentStatus,
    description: String,
    #[schema(example = "cus_123")]
    customer_id: String,
    #[schema(example = "PAY_20240101120000_0123456789abcdef")]
    transaction_id: String,
    metadata: PaymentMetadata,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new pending payment with a fresh id.
    pub fn new(
        amount: i64,
        currency: Currency,
        description: String,
        customer_id: String,
        transaction_id: String,
        metadata: PaymentMetadata,
    ) -> Self {
        let now = current_time();
        Self {
            id: PaymentId::new(),
            amount,
            currency,
            status: PaymentStatus::Pending,
            description,
            customer_id,
            transaction_id,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a payment from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: PaymentId,
        amount: i64,
        currency: Currency,
        status: PaymentStatus,
        description: String,
        customer_id: String,
        transaction_id: String,
        metadata: PaymentMetadata,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            currency,
            status,
            description,
            customer_id,
            transaction_id,
            metadata,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn metadata(&self) -> &PaymentMetadata {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the payment to `next` if the transition policy allows it.
    pub fn transition_to(&mut self, next: PaymentStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch();
        Ok(())
    }

    /// Refreshes `updated_at`. Called by repositories on every write.
    pub fn touch(&mut self) {
        self.updated_at = current_time();
    }
}

/// Current time at microsecond precision, the finest both stores keep.
fn current_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Payment {
        Payment::new(
            1000,
            Currency::JPY,
            String::new(),
            "cus_1".to_string(),
            "PAY_20240101000000_0011223344556677".to_string(),
            PaymentMetadata {
                order_id: "o-1".to_string(),
                product_id: String::new(),
                payment_method: PaymentMethod::CreditCard,
            },
        )
    }

    #[test]
    fn test_new_payment_is_pending() {
        let payment = sample();
        assert_eq!(payment.status(), PaymentStatus::Pending);
        assert_eq!(payment.created_at(), payment.updated_at());
    }

    #[test]
    fn test_transition_updates_timestamp() {
        let mut payment = sample();
        let created = payment.created_at();
        let before = payment.updated_at();

        payment.transition_to(PaymentStatus::Canceled).unwrap();

        assert_eq!(payment.status(), PaymentStatus::Canceled);
        assert!(payment.updated_at() >= before);
        assert_eq!(payment.created_at(), created);
    }

    #[test]
    fn test_invalid_transition_leaves_status() {
        let mut payment = sample();

        let result = payment.transition_to(PaymentStatus::Completed);

        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition {
                from: PaymentStatus::Pending,
                to: PaymentStatus::Completed
            })
        ));
        assert_eq!(payment.status(), PaymentStatus::Pending);
    }

    #[test]
    fn test_json_shape() {
        let payment = sample();
        let json = serde_json::to_value(&payment).unwrap();

        assert_eq!(json["status"], "pending");
        assert_eq!(json["currency"], "JPY");
        assert_eq!(json["metadata"]["payment_method"], "credit_card");
        assert!(json["id"].is_string());
    }
}
