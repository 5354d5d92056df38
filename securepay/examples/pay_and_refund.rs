//! Pays $1.00 on the SecurePay test gateway and refunds it.
//!
//! # Running this example
//!
//! ```bash
//! export SECUREPAY_MERCHANT_ID=ABC0001
//! export SECUREPAY_PASSWORD=abc123
//! RUST_LOG=info,securepay::wire=debug cargo run --example pay_and_refund
//! ```
//!
//! Set `SECUREPAY_CONFIG` to a TOML file to override endpoints, timeouts or
//! protocol constants.

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::use_debug,
    reason = "examples are allowed to use println and simple formatting"
)]

use std::{env, fs, io};

use securepay::{
    SecurePayClient,
    config::ClientConfig,
    error::PaymentError,
    models::{Environment, MerchantCredentials, PaymentRequest, RefundRequest},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(io::stderr))
        .init();
}

fn load_config() -> Result<ClientConfig, Box<dyn std::error::Error>> {
    match env::var("SECUREPAY_CONFIG") {
        Ok(path) => Ok(ClientConfig::from_toml(&fs::read_to_string(path)?)?),
        Err(_) => Ok(ClientConfig::default()),
    }
}

fn load_credentials() -> Result<MerchantCredentials, Box<dyn std::error::Error>> {
    let merchant_id = env::var("SECUREPAY_MERCHANT_ID")
        .map_err(|_| "SECUREPAY_MERCHANT_ID environment variable not set")?;
    let password = env::var("SECUREPAY_PASSWORD")
        .map_err(|_| "SECUREPAY_PASSWORD environment variable not set")?;
    Ok(MerchantCredentials::new(merchant_id, password))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let client = SecurePayClient::new(load_config()?)?;
    let credentials = load_credentials()?;

    // Test card from the SecurePay integration guide.
    let payment = PaymentRequest::new(100, "example-0001", "4444333322221111", "11/30")
        .with_cardholder_name("Test Person");

    let approved = match client.pay(&credentials, &payment, Environment::Test).await {
        Ok(approved) => approved,
        Err(PaymentError::Declined(decline)) => {
            println!("{decline} (bank code {})", decline.response_code);
            return Ok(());
        }
        Err(e) => {
            eprintln!("Payment failed: {e}");
            return Err(e.into());
        }
    };

    println!(
        "Payment approved: {} {} (transaction {:?})",
        approved.bank_response_code, approved.bank_response_text, approved.transaction_id
    );

    let Some(transaction_id) = approved.transaction_id else {
        eprintln!("Gateway did not return a transaction ID; cannot refund");
        return Ok(());
    };

    let refund = RefundRequest::new(100, "example-0001", transaction_id);
    let refunded = client.refund(&credentials, &refund, Environment::Test).await?;
    println!("Refund approved: transaction {:?}", refunded.transaction_id);

    Ok(())
}
