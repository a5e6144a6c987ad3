//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use payments_types::{
        Currency, Payment, PaymentId, PaymentMetadata, PaymentMethod, PaymentRepository,
        PaymentStatus, RepoError,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn metadata() -> PaymentMetadata {
        PaymentMetadata {
            order_id: "order-1".to_string(),
            product_id: "sku-1".to_string(),
            payment_method: PaymentMethod::BankTransfer,
        }
    }

    fn payment(transaction_id: &str) -> Payment {
        Payment::new(
            2500,
            Currency::USD,
            "Annual plan".to_string(),
            "cus_42".to_string(),
            transaction_id.to_string(),
            metadata(),
        )
    }

    /// A payment created `minutes` after a fixed instant.
    fn payment_at(minutes: i64, transaction_id: &str) -> Payment {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        Payment::from_parts(
            PaymentId::new(),
            100 + minutes,
            Currency::JPY,
            PaymentStatus::Pending,
            String::new(),
            "cus_1".to_string(),
            transaction_id.to_string(),
            metadata(),
            created,
            created,
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = setup_repo().await;
        let payment = payment("PAY_20240301120000_00000000000000a1");

        repo.create(&payment).await.unwrap();
        let fetched = repo.find_by_id(payment.id()).await.unwrap();

        assert_eq!(fetched, payment);
        assert_eq!(fetched.metadata().payment_method, PaymentMethod::BankTransfer);
        assert_eq!(fetched.status(), PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_not_found() {
        let repo = setup_repo().await;

        let result = repo.find_by_id(PaymentId::new()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_duplicate_transaction_id_is_conflict() {
        let repo = setup_repo().await;
        let txid = "PAY_20240301120000_00000000000000b2";

        repo.create(&payment(txid)).await.unwrap();
        let result = repo.create(&payment(txid)).await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
        assert_eq!(repo.list(10, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_writes_status_and_refreshes_timestamp() {
        let repo = setup_repo().await;
        let mut payment = payment_at(0, "PAY_20240301120000_00000000000000c3");
        repo.create(&payment).await.unwrap();
        let created_at = payment.created_at();

        payment.transition_to(PaymentStatus::Processing).unwrap();
        repo.update(&mut payment).await.unwrap();

        let stored = repo.find_by_id(payment.id()).await.unwrap();
        assert_eq!(stored.status(), PaymentStatus::Processing);
        assert_eq!(stored.created_at(), created_at);
        assert!(stored.updated_at() > created_at);
        assert_eq!(stored.updated_at(), payment.updated_at());
    }

    #[tokio::test]
    async fn test_update_missing_payment() {
        let repo = setup_repo().await;
        let mut payment = payment("PAY_20240301120000_00000000000000d4");

        let result = repo.update(&mut payment).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_newest_first_with_pagination() {
        let repo = setup_repo().await;
        // Insert out of order; the listing must sort by creation time.
        for (minutes, suffix) in [(1, "e1"), (3, "e3"), (0, "e0"), (2, "e2")] {
            let txid = format!("PAY_20240301120000_00000000000000{}", suffix);
            repo.create(&payment_at(minutes, &txid)).await.unwrap();
        }

        let all = repo.list(10, 0).await.unwrap();
        let amounts: Vec<i64> = all.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![103, 102, 101, 100]);

        let page = repo.list(2, 1).await.unwrap();
        let amounts: Vec<i64> = page.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![102, 101]);

        assert!(repo.list(10, 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_schema_creation_is_idempotent() {
        let repo = setup_repo().await;

        repo.create_schema().await.unwrap();
        repo.create_schema().await.unwrap();
    }
}
