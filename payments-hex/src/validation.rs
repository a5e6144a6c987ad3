//! Business rules for payment creation input.
//!
//! Rules are checked in a fixed order and the first violation wins.

use payments_types::{CreatePaymentRequest, Currency, DomainError, PaymentMethod};

/// Largest accepted amount, in the smallest currency unit.
pub const MAX_AMOUNT: i64 = 10_000_000;
pub const MIN_AMOUNT: i64 = 1;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_CUSTOMER_ID_LENGTH: usize = 100;

/// Validates a create-payment request.
pub fn validate_create_input(input: &CreatePaymentRequest) -> Result<(), DomainError> {
    if input.amount < MIN_AMOUNT {
        return Err(invalid("amount must be positive"));
    }
    if input.currency.is_empty() {
        return Err(invalid("currency is required"));
    }
    if input.customer_id.is_empty() {
        return Err(invalid("customer_id is required"));
    }
    if input.amount > MAX_AMOUNT {
        return Err(invalid("amount exceeds maximum allowed"));
    }
    if input.currency.parse::<Currency>().is_err() {
        return Err(invalid("unsupported currency"));
    }

    validate_payment_method(&input.payment_method)?;

    if input.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(invalid("description exceeds maximum length"));
    }
    if input.customer_id.chars().count() > MAX_CUSTOMER_ID_LENGTH {
        return Err(invalid("customer_id exceeds maximum length"));
    }

    Ok(())
}

fn validate_payment_method(method: &str) -> Result<(), DomainError> {
    if method.is_empty() {
        return Err(invalid("payment_method is required"));
    }
    if method.parse::<PaymentMethod>().is_err() {
        return Err(invalid("unsupported payment_method"));
    }
    Ok(())
}

fn invalid(msg: &str) -> DomainError {
    DomainError::Validation(msg.to_string())
}
