//! Client example demonstrating full payment flows against a running server.
//!
//! Run with: cargo run -p payments-app --example client_example --no-default-features --features sqlite

use payments_client::PaymentsClient;
use payments_hex::{
    PaymentService, SimulatedProcessor,
    inbound::{HttpServer, ServerOptions, auth::issue_token},
};
use payments_repo::build_repo;
use payments_types::{Claims, CreatePaymentRequest};
use std::net::SocketAddr;
use tempfile::tempdir;
use tokio::net::TcpListener;

const SECRET: &str = "example-secret";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("payments.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on {addr}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and migration)
    let repo = build_repo(&db_url).await?;

    // Start server in background with bearer auth enabled
    let service = PaymentService::new(repo, SimulatedProcessor::new());
    let server = HttpServer::with_options(
        service,
        ServerOptions {
            jwt_secret: Some(SECRET.to_string()),
            ..ServerOptions::default()
        },
    );
    let router = server.router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server stopped: {e}");
        }
    });

    let base_url = format!("http://{addr}");
    let client = PaymentsClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: Full payment flow
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server health: {} at {}", health.status, health.time);

    let order = CreatePaymentRequest {
        amount: 5000,
        currency: "JPY".into(),
        description: "Order #1001".into(),
        customer_id: "cus_123".into(),
        payment_method: "credit_card".into(),
        order_id: "order-1001".into(),
        product_id: "sku-42".into(),
    };

    let response = client.create_payment(&order).await;
    assert!(response.is_err());
    println!("✅ Unauthorized without token: {}", response.unwrap_err());

    let token = issue_token(
        SECRET,
        &Claims {
            sub: Some("example".into()),
            user_id: 1,
            role: "admin".into(),
            exp: (unix_now_secs() + 3600) as u64,
        },
    )?;
    let client = client.with_token(token);

    let payment = client.create_payment(&order).await?;
    println!(
        "✅ Created payment {} ({}, status={})",
        payment.id(),
        payment.transaction_id(),
        payment.status()
    );

    let second = client
        .create_payment(&CreatePaymentRequest {
            amount: 1250,
            currency: "USD".into(),
            payment_method: "bank_transfer".into(),
            ..order.clone()
        })
        .await?;
    println!("✅ Created payment {} ({})", second.id(), second.transaction_id());

    let rejected = client
        .create_payment(&CreatePaymentRequest {
            currency: "EUR".into(),
            ..order.clone()
        })
        .await;
    println!("✅ EUR rejected: {}", rejected.unwrap_err());

    let fetched = client.get_payment(payment.id()).await?;
    println!("✅ Fetched payment {} (amount={})", fetched.id(), fetched.amount());

    let listed = client.list_payments(Some(10), None).await?;
    println!("✅ Listed {} payments (newest first)", listed.len());

    let canceled = client.cancel_payment(second.id()).await?;
    println!("✅ Canceled payment {} (status={})", canceled.id(), canceled.status());

    println!("\n🎉 All flows completed successfully!");
    Ok(())
}

fn unix_now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
