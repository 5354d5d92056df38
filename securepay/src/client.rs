//! The payment client.
//!
//! [`SecurePayClient`] ties the pieces together. Each call stamps the current
//! time, builds the request document, reports its redacted copy to the
//! diagnostic logger, posts it once, and turns the answer into a
//! [`PaymentResponse`] or one of the three [`PaymentError`] tiers.
//!
//! [`PaymentError`]: crate::error::PaymentError

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::{
    config::ClientConfig,
    diagnostics::{DiagnosticLogger, TracingLogger},
    error::{ConfigError, GatewayError, Result},
    message::{RequestDocument, build_payment_request, build_refund_request},
    models::{Environment, MerchantCredentials, PaymentRequest, PaymentResponse, RefundRequest},
    response::{classify, excerpt, parse_response},
    transport::{HttpTransport, Transport},
};

/// Client for the SecurePay Secure XML API.
///
/// The client holds no mutable state and can be shared between tasks behind an
/// [`Arc`] or by reference.
///
/// # Examples
///
/// ```rust,no_run
/// use securepay::{
///     SecurePayClient,
///     config::ClientConfig,
///     error::PaymentError,
///     models::{Environment, MerchantCredentials, PaymentRequest},
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SecurePayClient::new(ClientConfig::default())?;
/// let credentials = MerchantCredentials::new("ABC0001", "abc123");
/// let request = PaymentRequest::new(100, "INV-1234", "4444333322221111", "11/22");
///
/// match client.pay(&credentials, &request, Environment::Test).await {
///     Ok(payment) => println!("approved: {:?}", payment.transaction_id),
///     Err(PaymentError::Declined(decline)) => println!("{decline}"),
///     Err(e) => eprintln!("payment failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SecurePayClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
    logger: Arc<dyn DiagnosticLogger>,
}

impl SecurePayClient<HttpTransport> {
    /// Validates `config` and creates a client over [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> SecurePayClient<T> {
    /// Creates a client over an existing transport.
    ///
    /// `config` is used as given; call [`ClientConfig::validate`] first if it
    /// did not come from [`ClientConfig::from_toml`].
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport, logger: Arc::new(TracingLogger) }
    }

    /// Replaces the default [`TracingLogger`].
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn DiagnosticLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Charges a card.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::Transport`](crate::error::PaymentError::Transport) if
    ///   no response arrived
    /// - [`PaymentError::Gateway`](crate::error::PaymentError::Gateway) for a
    ///   non-normal status, HTTP error or unreadable response
    /// - [`PaymentError::Declined`](crate::error::PaymentError::Declined) if the
    ///   bank declined the card
    #[instrument(
        skip(self, credentials, request),
        fields(
            purchase_order_id = %request.purchase_order_id,
            amount = request.amount,
            environment = %environment
        )
    )]
    pub async fn pay(
        &self,
        credentials: &MerchantCredentials,
        request: &PaymentRequest,
        environment: Environment,
    ) -> Result<PaymentResponse> {
        info!(card = %request.card_number.masked(), "submitting payment");
        let document =
            build_payment_request(&self.config.protocol, &Utc::now(), credentials, request)?;
        self.submit(document, environment).await
    }

    /// Refunds an earlier payment.
    ///
    /// # Errors
    ///
    /// Same tiers as [`pay`](Self::pay).
    #[instrument(
        skip(self, credentials, request),
        fields(
            purchase_order_id = %request.purchase_order_id,
            amount = request.amount,
            environment = %environment
        )
    )]
    pub async fn refund(
        &self,
        credentials: &MerchantCredentials,
        request: &RefundRequest,
        environment: Environment,
    ) -> Result<PaymentResponse> {
        info!(transaction_id = %request.transaction_id, "submitting refund");
        let document =
            build_refund_request(&self.config.protocol, &Utc::now(), credentials, request)?;
        self.submit(document, environment).await
    }

    async fn submit(
        &self,
        document: RequestDocument,
        environment: Environment,
    ) -> Result<PaymentResponse> {
        self.logger.request(document.redacted());

        let url = self.config.endpoints.url_for(environment);
        let response = self.transport.post(url, document.as_bytes()).await?;
        drop(document);

        if !response.is_success() {
            return Err(GatewayError::HttpStatus {
                status: response.status,
                excerpt: excerpt(&response.body),
            }
            .into());
        }

        let result = parse_response(&self.config.protocol, &response.body)?;
        self.logger.response(&result);

        match classify(result) {
            Ok(payment) => {
                info!(transaction_id = ?payment.transaction_id, "transaction approved");
                Ok(payment)
            }
            Err(decline) => {
                info!(
                    response_code = %decline.response_code,
                    transaction_id = ?decline.transaction_id,
                    "transaction declined"
                );
                Err(decline.into())
            }
        }
    }
}
