//! Transaction identifier generation.
//!
//! Identifiers look like `PAY_20240131093015_9f86d081884c7d65`:
//! a fixed prefix, the UTC time to the second, and 8 bytes from the OS
//! random source encoded as lowercase hex.

use chrono::Utc;
use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::DomainError;

/// Prefix used for payment transaction ids.
pub const PAYMENT_PREFIX: &str = "PAY";

/// Shortest string `validate_transaction_id` accepts.
pub const MIN_TRANSACTION_ID_LEN: usize = 25;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const RANDOM_BYTES: usize = 8;

/// Produces transaction identifiers.
pub trait TransactionIdGenerator: Send + Sync {
    /// Generates a new identifier. Fails only when secure randomness is unavailable.
    fn generate(&self) -> Result<String, DomainError>;
}

/// `<prefix>_<yyyymmddhhmmss>_<16 hex chars>` generator backed by the OS CSPRNG.
#[derive(Debug, Clone)]
pub struct PrefixedTransactionIdGenerator {
    prefix: String,
}

impl PrefixedTransactionIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The generator used for payments (`PAY` prefix).
    pub fn payments() -> Self {
        Self::new(PAYMENT_PREFIX)
    }
}

impl Default for PrefixedTransactionIdGenerator {
    fn default() -> Self {
        Self::payments()
    }
}

impl TransactionIdGenerator for PrefixedTransactionIdGenerator {
    fn generate(&self) -> Result<String, DomainError> {
        let timestamp = Utc::now().format(TIMESTAMP_FORMAT);

        let mut random_bytes = [0u8; RANDOM_BYTES];
        OsRng
            .try_fill_bytes(&mut random_bytes)
            .map_err(|e| DomainError::EntropyUnavailable(e.to_string()))?;

        Ok(format!(
            "{}_{}_{}",
            self.prefix,
            timestamp,
            hex::encode(random_bytes)
        ))
    }
}

/// Checks the shape of a payment transaction id. Does not check existence.
pub fn validate_transaction_id(transaction_id: &str) -> Result<(), DomainError> {
    if transaction_id.len() < MIN_TRANSACTION_ID_LEN {
        return Err(DomainError::Validation(
            "invalid transaction id format".into(),
        ));
    }

    if !transaction_id.starts_with(PAYMENT_PREFIX) {
        return Err(DomainError::Validation(
            "invalid transaction id prefix".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_layout() {
        let id = PrefixedTransactionIdGenerator::payments().generate().unwrap();
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PAY");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 16);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
        assert_eq!(id.len(), 35);
    }

    #[test]
    fn test_generated_ids_pass_validation() {
        let generator = PrefixedTransactionIdGenerator::payments();
        for _ in 0..100 {
            let id = generator.generate().unwrap();
            assert!(validate_transaction_id(&id).is_ok(), "{id} rejected");
        }
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let generator = PrefixedTransactionIdGenerator::payments();
        let ids: HashSet<String> = (0..500).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_custom_prefix() {
        let id = PrefixedTransactionIdGenerator::new("REF").generate().unwrap();
        assert!(id.starts_with("REF_"));
        assert!(matches!(
            validate_transaction_id(&id),
            Err(DomainError::Validation(msg)) if msg == "invalid transaction id prefix"
        ));
    }

    #[test]
    fn test_validate_rejects_short_ids() {
        let short = "PAY_2024010100000_abcdef";
        assert_eq!(short.len(), 24);
        assert!(matches!(
            validate_transaction_id(short),
            Err(DomainError::Validation(msg)) if msg == "invalid transaction id format"
        ));
        assert!(validate_transaction_id("").is_err());
    }

    #[test]
    fn test_validate_accepts_minimum_length() {
        assert!(validate_transaction_id("PAY_20240101000000_abcdef").is_ok());
    }
}
