//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use payments_types::{PaymentProcessor, PaymentRepository};

use super::auth::{JwtAuth, auth_middleware};
use super::handlers::{self, AppState};
use super::rate_limit::{DEFAULT_REQUESTS_PER_MINUTE, RateLimiterState, rate_limit_middleware};
use crate::PaymentService;
use crate::openapi::ApiDoc;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Tunables for the HTTP layer.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub requests_per_minute: u32,
    pub request_timeout: Duration,
    /// Enables bearer authentication when set.
    pub jwt_secret: Option<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            jwt_secret: None,
        }
    }
}

/// HTTP Server for the Payments API.
pub struct HttpServer<R: PaymentRepository, P: PaymentProcessor> {
    state: Arc<AppState<R, P>>,
    rate_limiter: Arc<RateLimiterState>,
    auth: Option<Arc<JwtAuth>>,
    request_timeout: Duration,
}

impl<R: PaymentRepository, P: PaymentProcessor> HttpServer<R, P> {
    /// Creates a new HTTP server with default options.
    pub fn new(service: PaymentService<R, P>) -> Self {
        Self::with_options(service, ServerOptions::default())
    }

    /// Creates a new HTTP server with custom rate limiting.
    pub fn with_rate_limit(service: PaymentService<R, P>, requests_per_minute: u32) -> Self {
        Self::with_options(
            service,
            ServerOptions {
                requests_per_minute,
                ..ServerOptions::default()
            },
        )
    }

    pub fn with_options(service: PaymentService<R, P>, options: ServerOptions) -> Self {
        Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(RateLimiterState::per_minute(options.requests_per_minute)),
            auth: options
                .jwt_secret
                .as_deref()
                .map(|secret| Arc::new(JwtAuth::new(secret))),
            request_timeout: options.request_timeout,
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        let router = Router::new()
            .route("/health", get(handlers::health))
            .route(
                "/api/v1/payments",
                post(handlers::create_payment::<R, P>).get(handlers::list_payments::<R, P>),
            )
            .route("/api/v1/payments/{id}", get(handlers::get_payment::<R, P>))
            .route(
                "/api/v1/payments/{id}/cancel",
                post(handlers::cancel_payment::<R, P>),
            )
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .layer(metrics)
            // Inside the auth layer so verified claims are visible
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ));

        let router = match &self.auth {
            Some(auth) => router.layer(middleware::from_fn_with_state(
                auth.clone(),
                auth_middleware,
            )),
            None => router,
        };

        router
            .layer(TimeoutLayer::new(self.request_timeout))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);
        if self.auth.is_some() {
            tracing::info!("Bearer authentication enabled");
        }

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
