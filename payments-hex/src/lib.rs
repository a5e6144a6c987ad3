//! # Payments Hex
//!
//! Application service layer and adapters for the payments service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `validation/` - Business rules for incoming payment requests
//! - `inbound/` - HTTP adapter (Axum server)
//! - `outbound/` - Payment processor adapters
//!
//! The service is generic over `R: PaymentRepository` and `P: PaymentProcessor`,
//! allowing different implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;
pub mod validation;


pub use outbound::SimulatedProcessor;
pub use service::PaymentService;
