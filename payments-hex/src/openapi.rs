//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use payments_types::domain::{
    Currency, Payment, PaymentId, PaymentMetadata, PaymentMethod, PaymentStatus,
};
use payments_types::dto::{CreatePaymentRequest, ErrorResponse, HealthResponse};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

// Path stubs for OpenAPI generation; the real handlers live in `inbound::handlers`.

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
async fn health() {}

/// Create a payment
///
/// Validates the request, assigns a transaction id and hands the payment to
/// the processor. The returned payment is `pending`.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Storage or processor failure", body = ErrorResponse)
    )
)]
async fn create_payment() {}

/// List payments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(
        ("limit" = Option<i64>, Query, description = "Page size; values <= 0 mean 10"),
        ("offset" = Option<i64>, Query, description = "Rows to skip; negative values mean 0")
    ),
    responses(
        (status = 200, description = "Payments", body = Vec<Payment>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
async fn list_payments() {}

/// Get a payment by ID
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Payment ID (UUID)")
    ),
    responses(
        (status = 200, description = "Payment found", body = Payment),
        (status = 404, description = "Payment not found or ID malformed", body = ErrorResponse)
    )
)]
async fn get_payment() {}

/// Cancel a pending payment
#[utoipa::path(
    post,
    path = "/api/v1/payments/{id}/cancel",
    tag = "payments",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Payment ID (UUID)")
    ),
    responses(
        (status = 200, description = "Payment canceled", body = Payment),
        (status = 400, description = "Payment is not pending", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
        (status = 500, description = "Processor refused the cancellation", body = ErrorResponse)
    )
)]
async fn cancel_payment() {}

/// OpenAPI documentation for the Payments API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payments API",
        version = "1.0.0",
        description = "Create, inspect and cancel payments.\n\n## Authentication\n\nWhen the server runs with `JWT_SECRET` set, every endpoint except `/health` requires an HS256 bearer token:\n\n```\nAuthorization: Bearer <jwt>\n```",
        license(name = "MIT"),
    ),
    paths(
        health,
        create_payment,
        list_payments,
        get_payment,
        cancel_payment,
    ),
    components(
        schemas(
            CreatePaymentRequest,
            Payment,
            PaymentId,
            PaymentMetadata,
            PaymentMethod,
            PaymentStatus,
            Currency,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "payments", description = "Payment operations"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
