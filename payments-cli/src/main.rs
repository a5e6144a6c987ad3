//! Payments CLI
//!
//! Command-line interface for the Payments API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use payments_client::PaymentsClient;
use payments_hex::inbound::auth::issue_token;
use payments_types::{Claims, CreatePaymentRequest, PaymentId};

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "Payments API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Payments API
    #[arg(
        long,
        env = "PAYMENTS_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    /// Bearer token for servers running with JWT_SECRET
    #[arg(long, env = "PAYMENTS_API_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Bearer token helpers
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Create a new payment
    Create {
        /// Amount in the smallest currency unit
        #[arg(long)]
        amount: i64,
        /// Currency (USD, JPY)
        #[arg(long, default_value = "JPY")]
        currency: String,
        #[arg(long)]
        customer: String,
        /// Payment method (credit_card, bank_transfer, convenience_store)
        #[arg(long, default_value = "credit_card")]
        method: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        order_id: String,
        #[arg(long, default_value = "")]
        product_id: String,
    },
    /// Get payment details
    Get {
        /// Payment ID (UUID)
        id: String,
    },
    /// List payments, newest first
    List {
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },
    /// Cancel a pending payment
    Cancel {
        /// Payment ID (UUID)
        id: String,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Issue an HS256 token signed with the server's secret
    Issue {
        #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long)]
        user_id: u64,
        #[arg(long, default_value = "user")]
        role: String,
        #[arg(long)]
        sub: Option<String>,
        /// Lifetime in hours
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

fn parse_payment_id(s: &str) -> Result<PaymentId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid payment ID: {}", s))
}

fn token_claims(user_id: u64, role: String, sub: Option<String>, ttl_hours: i64) -> Result<Claims> {
    let exp = chrono::TimeDelta::try_hours(ttl_hours)
        .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| anyhow::anyhow!("--ttl-hours {} is out of range", ttl_hours))?;
    let exp = u64::try_from(exp.timestamp())
        .map_err(|_| anyhow::anyhow!("Token expiry lies before the Unix epoch"))?;

    Ok(Claims {
        sub,
        user_id,
        role,
        exp,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = PaymentsClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => match client.health().await {
            Ok(health) => println!("✓ API is {} ({})", health.status, health.time),
            Err(e) => {
                println!("✗ API is not healthy: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Payment { action } => match action {
            PaymentCommands::Create {
                amount,
                currency,
                customer,
                method,
                description,
                order_id,
                product_id,
            } => {
                let req = CreatePaymentRequest {
                    amount,
                    currency: currency.to_uppercase(),
                    description,
                    customer_id: customer,
                    payment_method: method,
                    order_id,
                    product_id,
                };
                let payment = client.create_payment(&req).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::Get { id } => {
                let payment = client.get_payment(parse_payment_id(&id)?).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::List { limit, offset } => {
                let payments = client.list_payments(limit, offset).await?;
                println!("{}", serde_json::to_string_pretty(&payments)?);
            }
            PaymentCommands::Cancel { id } => {
                let payment = client.cancel_payment(parse_payment_id(&id)?).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
        },

        Commands::Token { action } => match action {
            TokenCommands::Issue {
                secret,
                user_id,
                role,
                sub,
                ttl_hours,
            } => {
                let claims = token_claims(user_id, role, sub, ttl_hours)?;
                println!("{}", issue_token(&secret, &claims)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_payment_create() {
        let cli = Cli::try_parse_from([
            "payments",
            "payment",
            "create",
            "--amount",
            "5000",
            "--customer",
            "cus_1",
        ])
        .unwrap();

        match cli.command {
            Commands::Payment {
                action:
                    PaymentCommands::Create {
                        amount,
                        currency,
                        method,
                        ..
                    },
            } => {
                assert_eq!(amount, 5000);
                assert_eq!(currency, "JPY");
                assert_eq!(method, "credit_card");
            }
            _ => panic!("expected payment create"),
        }
    }

    #[test]
    fn test_parse_payment_id() {
        assert!(parse_payment_id("not-a-uuid").is_err());
        let id = PaymentId::new();
        assert_eq!(parse_payment_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_token_claims_expire_in_future() {
        let claims = token_claims(7, "admin".into(), None, 1).unwrap();
        let now = chrono::Utc::now().timestamp() as u64;

        assert_eq!(claims.user_id, 7);
        assert!(claims.exp > now);
        assert!(claims.exp <= now + 3600);
    }

    #[test]
    fn test_token_claims_reject_out_of_range_ttl() {
        let err = token_claims(7, "admin".into(), None, i64::MAX).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        assert!(token_claims(7, "admin".into(), None, i64::MIN).is_err());
    }
}
