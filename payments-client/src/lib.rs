//! # Payments Client SDK
//!
//! A typed Rust client for the Payments API.

use payments_types::{CreatePaymentRequest, HealthResponse, Payment, PaymentId};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Payments API client.
pub struct PaymentsClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl PaymentsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http: Client::new(),
        }
    }

    /// Sets the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Fetches the server health report.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get("/health").await
    }

    /// Creates a payment.
    pub async fn create_payment(&self, req: &CreatePaymentRequest) -> Result<Payment, ClientError> {
        self.post("/api/v1/payments", Some(req)).await
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, ClientError> {
        self.get(&format!("/api/v1/payments/{}", id)).await
    }

    /// Lists payments, newest first. `None` lets the server pick its defaults.
    pub async fn list_payments(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Payment>, ClientError> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(format!("limit={}", limit));
        }
        if let Some(offset) = offset {
            params.push(format!("offset={}", offset));
        }

        let path = if params.is_empty() {
            "/api/v1/payments".to_string()
        } else {
            format!("/api/v1/payments?{}", params.join("&"))
        };
        self.get(&path).await
    }

    /// Cancels a pending payment.
    pub async fn cancel_payment(&self, id: PaymentId) -> Result<Payment, ClientError> {
        self.post::<_, ()>(&format!("/api/v1/payments/{}/cancel", id), None)
            .await
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let req = self.authorize(self.http.get(format!("{}{}", self.base_url, path)));
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let mut req = self.authorize(self.http.post(format!("{}{}", self.base_url, path)));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(api_error(status.as_u16(), body))
        }
    }
}

/// Builds an API error, preferring the `message` field of a JSON error body.
fn api_error(status: u16, body: String) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|field| v.get(*field).and_then(|e| e.as_str()).map(String::from))
        })
        .unwrap_or(body);

    ClientError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PaymentsClient::new("http://localhost:8080");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = PaymentsClient::new("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_client_with_token() {
        let client = PaymentsClient::new("http://localhost:8080").with_token("jwt");
        assert_eq!(client.token, Some("jwt".to_string()));
    }

    #[test]
    fn test_api_error_prefers_message() {
        let body = r#"{"error":"Bad Request","message":"unsupported currency","code":"ERR_400"}"#;
        match api_error(400, body.to_string()) {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "unsupported currency");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        match api_error(502, "bad gateway".to_string()) {
            ClientError::Api { message, .. } => assert_eq!(message, "bad gateway"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
