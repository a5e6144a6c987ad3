//! # Payments Types
//!
//! Domain types and port traits for the payment service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Payment, PaymentStatus, transaction ids)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Currency, Payment, PaymentId, PaymentMetadata, PaymentMethod, PaymentStatus,
    PrefixedTransactionIdGenerator, TransactionIdGenerator, validate_transaction_id,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{PaymentProcessor, PaymentRepository, ProcessorError};
