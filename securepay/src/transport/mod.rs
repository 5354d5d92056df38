//! Transport abstraction.
//!
//! A [`Transport`] performs exactly one HTTP POST of a request document and
//! hands back the status and raw body. It does not interpret the body and it
//! does not retry: a retried payment without deduplication can charge a card
//! twice.
//!
//! Only failures that prevent a response from arriving (DNS, connect, TLS,
//! timeout, body read) are errors here. A response with a non-success status is
//! returned as-is and classified by the client.
//!
//! # Examples
//!
//! ```rust,no_run
//! use securepay::transport::{HttpTransport, Transport};
//! use url::Url;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new()?;
//! let url = Url::parse("https://test.securepay.com.au/xmlapi/payment")?;
//!
//! let response = transport.post(&url, b"<SecurePayMessage/>").await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use url::Url;

use crate::error::TransportError;

pub mod config;
pub mod http;
pub(crate) mod sealed;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// MIME type sent with every request document.
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Response from a transport round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Request/response transport to the gateway.
///
/// This trait is sealed; [`HttpTransport`] is the production implementation.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// POSTs `body` to `url` and returns whatever the server answered.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if no response was received.
    fn post<'a>(
        &'a self,
        url: &'a Url,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send + 'a;

    /// Returns the protocol name for logging.
    ///
    /// Examples: "http/1.1", "http/2", "http"
    fn protocol_name(&self) -> &'static str;
}
