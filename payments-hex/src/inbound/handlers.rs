//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use payments_types::{
    AppError, CreatePaymentRequest, ErrorResponse, HealthResponse, ListPaymentsQuery, PaymentId,
    PaymentProcessor, PaymentRepository,
};

use crate::PaymentService;

/// Application state shared across handlers.
pub struct AppState<R: PaymentRepository, P: PaymentProcessor> {
    pub service: PaymentService<R, P>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal { .. } => {
                if let Some(cause) = self.0.cause() {
                    tracing::error!(error = %cause, "Request failed with internal error");
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        error_response(status, message)
    }
}

/// Renders the uniform error body for `status`.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message: message.into(),
        code: format!("ERR_{}", status.as_u16()),
    };

    (status, Json(body)).into_response()
}

/// An id that is not a UUID cannot name a stored payment.
fn parse_payment_id(raw: &str) -> Result<PaymentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError(AppError::NotFound("payment not found".into())))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        time: chrono::Utc::now().to_rfc3339(),
    })
}

/// Create a payment.
#[tracing::instrument(skip(state, body))]
pub async fn create_payment<R: PaymentRepository, P: PaymentProcessor>(
    State(state): State<Arc<AppState<R, P>>>,
    body: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected create payment body");
        AppError::Validation("invalid request body".into())
    })?;

    let payment = state.service.create_payment(req).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Get a payment by ID.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn get_payment<R: PaymentRepository, P: PaymentProcessor>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id = parse_payment_id(&id)?;

    let payment = state.service.get_payment(payment_id).await?;
    Ok(Json(payment))
}

/// List payments, newest first.
///
/// `limit` and `offset` are optional; values that do not parse as integers
/// are ignored.
#[tracing::instrument(skip(state))]
pub async fn list_payments<R: PaymentRepository, P: PaymentProcessor>(
    State(state): State<Arc<AppState<R, P>>>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .service
        .list_payments(query.limit(), query.offset())
        .await?;
    Ok(Json(payments))
}

/// Cancel a pending payment.
#[tracing::instrument(skip(state), fields(payment_id = %id))]
pub async fn cancel_payment<R: PaymentRepository, P: PaymentProcessor>(
    State(state): State<Arc<AppState<R, P>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id = parse_payment_id(&id)?;

    let payment = state.service.cancel_payment(payment_id).await?;
    Ok(Json(payment))
}
