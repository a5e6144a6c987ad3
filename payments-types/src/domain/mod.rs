//! Domain models for the payment service.

pub mod currency;
pub mod payment;
pub mod status;
pub mod transaction_id;

pub use currency::{Currency, PaymentMethod, UnknownVariant};
pub use payment::{Payment, PaymentId, PaymentMetadata};
pub use status::PaymentStatus;
pub use transaction_id::{
    PAYMENT_PREFIX, PrefixedTransactionIdGenerator, TransactionIdGenerator,
    validate_transaction_id,
};
