//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a payment.
///
/// Fields are kept as raw strings so validation can name the exact rule a
/// value breaks. Missing fields deserialize to their empty value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePaymentRequest {
    /// Amount in smallest currency unit (cents, yen)
    #[schema(example = 5000)]
    pub amount: i64,
    #[schema(example = "JPY")]
    pub currency: String,
    /// Free-text description (max 500 characters)
    #[schema(example = "Monthly subscription")]
    pub description: String,
    /// Paying customer (max 100 characters)
    #[schema(example = "cus_123")]
    pub customer_id: String,
    /// One of `credit_card`, `bank_transfer`, `convenience_store`
    #[schema(example = "credit_card")]
    pub payment_method: String,
    #[schema(example = "order-1001")]
    pub order_id: String,
    #[schema(example = "sku-42")]
    pub product_id: String,
}

/// Pagination parameters for listing payments.
///
/// Kept as raw strings so that values which are not integers are ignored
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPaymentsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListPaymentsQuery {
    /// Requested page size, 0 when absent or unparsable.
    pub fn limit(&self) -> i64 {
        parse_lenient(self.limit.as_deref())
    }

    /// Requested offset, 0 when absent or unparsable.
    pub fn offset(&self) -> i64 {
        parse_lenient(self.offset.as_deref())
    }
}

fn parse_lenient(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Service DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    /// Server time (RFC 3339)
    pub time: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP reason phrase
    #[schema(example = "Bad Request")]
    pub error: String,
    /// What went wrong
    #[schema(example = "unsupported currency")]
    pub message: String,
    #[schema(example = "ERR_400")]
    pub code: String,
}

/// JWT claims accepted by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub user_id: u64,
    pub role: String,
    /// Expiry (seconds since the Unix epoch)
    pub exp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_ignores_garbage() {
        let query = ListPaymentsQuery {
            limit: Some("abc".into()),
            offset: Some(" 20 ".into()),
        };

        assert_eq!(query.limit(), 0);
        assert_eq!(query.offset(), 20);
        assert_eq!(ListPaymentsQuery::default().limit(), 0);
    }

    #[test]
    fn test_list_query_keeps_negative_values_for_the_service() {
        let query = ListPaymentsQuery {
            limit: Some("-5".into()),
            offset: Some("-1".into()),
        };

        assert_eq!(query.limit(), -5);
        assert_eq!(query.offset(), -1);
    }
}
