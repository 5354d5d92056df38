//! SecurePay: card payments and refunds over the Secure XML API
//!
//! A Rust client for SecurePay's Secure XML payment gateway. It builds the
//! gateway's XML request documents, posts them over HTTPS, and classifies the
//! answer into an approval or one of three distinct failure tiers.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │  SecurePayClient  │  pay / refund
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐     ┌──────────────────┐
//! │  message builder  │────▶│ DiagnosticLogger │  redacted copy only
//! └─────────┬─────────┘     └────────▲─────────┘
//!           │ XML (UTF-8)            │
//! ┌─────────▼─────────┐              │
//! │     Transport     │  one POST, no retries
//! └─────────┬─────────┘              │
//!           │ status + body          │
//! ┌─────────▼─────────┐              │
//! │  response parser  │──────────────┘
//! └─────────┬─────────┘
//!           │
//!   PaymentResponse | PaymentError::{Transport, Gateway, Declined}
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use securepay::{
//!     SecurePayClient,
//!     config::ClientConfig,
//!     models::{Environment, MerchantCredentials, PaymentRequest, RefundRequest},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SecurePayClient::new(ClientConfig::default())?;
//! let credentials = MerchantCredentials::new("ABC0001", "abc123");
//!
//! // The test gateway approves amounts ending in 00 or 08.
//! let payment = PaymentRequest::new(100, "1234", "4444333322221111", "11/22")
//!     .with_cardholder_name("Test Person");
//! let approved = client.pay(&credentials, &payment, Environment::Test).await?;
//!
//! // Refunds need the original purchase order and transaction IDs.
//! if let Some(transaction_id) = approved.transaction_id {
//!     let refund = RefundRequest::new(100, "1234", transaction_id);
//!     client.refund(&credentials, &refund, Environment::Test).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`client`]: the [`SecurePayClient`] facade
//! - [`message`]: request document construction and redaction
//! - [`response`]: response parsing and outcome classification
//! - [`transport`]: sealed HTTP transport
//! - [`config`]: TOML configuration
//! - [`protocol`]: fixed protocol constants and revision
//! - [`models`], [`card`], [`timestamp`]: value types and formatting
//! - [`diagnostics`]: redacting wire logger
//! - [`error`]: error tiers
//!
//! # Security Considerations
//!
//! - Card numbers are held in [`card::CardNumber`], which masks its `Debug`
//!   output and zeroizes on drop.
//! - Passwords are held in a `secrecy::SecretString`.
//! - Diagnostics only ever receive the redacted request document. Malformed
//!   response excerpts are scrubbed for card numbers before they reach an
//!   error message.
//! - Configured endpoints must be HTTPS.
//!
//! # Error Handling
//!
//! Every failure is a [`PaymentError`]. A decline is an
//! expected outcome and should be shown to the cardholder; the other two tiers
//! are system faults:
//!
//! ```rust
//! use securepay::{
//!     PaymentError, SecurePayClient,
//!     models::{Environment, MerchantCredentials, PaymentRequest},
//! };
//!
//! # async fn example(client: SecurePayClient, credentials: MerchantCredentials) {
//! let request = PaymentRequest::new(151, "1234", "4444333322221111", "11/22");
//!
//! match client.pay(&credentials, &request, Environment::Test).await {
//!     Ok(payment) => println!("Approved: {:?}", payment.transaction_id),
//!     Err(PaymentError::Declined(decline)) => {
//!         // Ask for a different card.
//!         println!("{decline}");
//!     }
//!     Err(PaymentError::Transport(e)) => {
//!         // The charge may have gone through; check before resubmitting.
//!         eprintln!("Network error: {e}");
//!     }
//!     Err(PaymentError::Gateway(e)) => eprintln!("Gateway error: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod card;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod message;
pub mod models;
pub mod protocol;
pub mod response;
pub mod timestamp;
pub mod transport;

pub use client::SecurePayClient;
pub use error::{PaymentError, Result};
