//! Client round trips against a live server on an ephemeral port.

use payments_client::{ClientError, PaymentsClient};
use payments_hex::{PaymentService, SimulatedProcessor, inbound::HttpServer};
use payments_repo::SqliteRepo;
use payments_types::{CreatePaymentRequest, PaymentId, PaymentStatus};
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let router = HttpServer::new(PaymentService::new(repo, SimulatedProcessor::new())).router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn request(amount: i64) -> CreatePaymentRequest {
    CreatePaymentRequest {
        amount,
        currency: "USD".to_string(),
        description: "Team plan".to_string(),
        customer_id: "cus_9".to_string(),
        payment_method: "bank_transfer".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_payment_lifecycle() {
    let client = PaymentsClient::new(spawn_server().await);

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "ok");

    let created = client.create_payment(&request(1999)).await.unwrap();
    assert_eq!(created.status(), PaymentStatus::Pending);
    assert_eq!(created.amount(), 1999);

    let fetched = client.get_payment(created.id()).await.unwrap();
    assert_eq!(fetched.transaction_id(), created.transaction_id());

    let listed = client.list_payments(Some(5), None).await.unwrap();
    assert_eq!(listed.len(), 1);

    let canceled = client.cancel_payment(created.id()).await.unwrap();
    assert_eq!(canceled.status(), PaymentStatus::Canceled);
}

#[tokio::test]
async fn test_api_errors_carry_status_and_message() {
    let client = PaymentsClient::new(spawn_server().await);

    match client.create_payment(&request(0)).await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "amount must be positive");
        }
        other => panic!("expected API error, got {:?}", other),
    }

    match client.get_payment(PaymentId::new()).await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected API error, got {:?}", other),
    }
}
