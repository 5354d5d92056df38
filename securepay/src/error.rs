//! Error types for the SecurePay client.
//!
//! Every failed payment or refund surfaces as a [`PaymentError`], which has
//! exactly three mutually exclusive tiers:
//!
//! - **Transport** ([`PaymentError::Transport`]): no gateway response was received
//!   (DNS failure, connection refused, TLS failure, client-side timeout).
//! - **Gateway** ([`PaymentError::Gateway`]): a response arrived but the gateway
//!   reported a non-normal status, or the response could not be read at all.
//! - **Declined** ([`PaymentError::Declined`]): the bank processed the transaction
//!   and declined it.
//!
//! Problems found while building a client (bad TOML, non-HTTPS endpoint) are
//! reported separately as [`ConfigError`] and never come out of `pay`/`refund`.
//!
//! # Examples
//!
//! ```
//! use securepay::error::{ErrorKind, GatewayError, PaymentError};
//!
//! let err = PaymentError::from(GatewayError::Status {
//!     code: "504".to_owned(),
//!     description: "Invalid merchant ID".to_owned(),
//! });
//! assert_eq!(err.kind(), ErrorKind::Gateway);
//! assert_eq!(err.to_string(), "Payment gateway error 504: Invalid merchant ID.");
//! ```

use thiserror::Error;

/// Result type alias for payment operations.
///
/// All fallible operations that talk to the gateway return this type.
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors returned by [`pay`](crate::SecurePayClient::pay) and
/// [`refund`](crate::SecurePayClient::refund).
///
/// Match on the variant (or on [`kind`](Self::kind)) to pick a user-facing
/// message: transport and gateway errors are system faults, a decline means
/// "try a different card".
///
/// # Error Recovery
///
/// - **Transport** ([`Transport`](Self::Transport)): the payment may or may not have
///   reached the bank. Check the transaction before resubmitting; this client never
///   retries on its own because a blind retry risks charging the card twice.
/// - **Gateway** ([`Gateway`](Self::Gateway)): usually a request-formation or
///   credential problem. Retrying will not help until the cause is fixed.
/// - **Declined** ([`Declined`](Self::Declined)): show the bank's response text to
///   the cardholder.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Network failure before any gateway response was received.
    #[error("transport failure talking to payment gateway: {0}")]
    Transport(#[from] TransportError),

    /// The gateway answered but reported a systemic problem.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The bank declined the transaction.
    #[error(transparent)]
    Declined(#[from] Decline),
}

impl PaymentError {
    /// Returns which of the three error tiers this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Gateway(_) => ErrorKind::Gateway,
            Self::Declined(_) => ErrorKind::Declined,
        }
    }

    /// Returns the decline details if the bank declined the transaction.
    #[must_use]
    pub const fn as_decline(&self) -> Option<&Decline> {
        match self {
            Self::Declined(decline) => Some(decline),
            _ => None,
        }
    }
}

/// Discriminant of [`PaymentError`] for callers that only need the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`PaymentError::Transport`].
    Transport,
    /// See [`PaymentError::Gateway`].
    Gateway,
    /// See [`PaymentError::Declined`].
    Declined,
}

/// Network-level failure wrapping the underlying [`reqwest::Error`].
///
/// Common causes:
/// - DNS resolution failures
/// - Connection refused
/// - TLS handshake errors
/// - The client-side request timeout elapsing
#[derive(Debug, Error)]
#[error("{source}")]
pub struct TransportError {
    #[source]
    source: reqwest::Error,
}

impl TransportError {
    pub(crate) const fn new(source: reqwest::Error) -> Self {
        Self { source }
    }

    /// Returns true if the client-side request timeout elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.source.is_timeout()
    }

    /// Returns true if the connection could not be established.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.source.is_connect()
    }

    /// Returns the underlying HTTP client error.
    #[must_use]
    pub const fn source_error(&self) -> &reqwest::Error {
        &self.source
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(source: reqwest::Error) -> Self {
        Self::new(source)
    }
}

/// Gateway-tier failures.
///
/// Each variant means the request reached the gateway (or could not be formed)
/// but the exchange failed for a reason that needs a fix rather than a
/// different card.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway reported a status code other than the normal one.
    ///
    /// Code and description are copied verbatim from the response. Typical
    /// causes are a malformed request or an authentication failure.
    #[error("Payment gateway error {code}: {description}.")]
    Status {
        /// Gateway status code, e.g. `"504"`.
        code: String,
        /// Gateway status description.
        description: String,
    },

    /// The response body could not be read as a gateway document.
    ///
    /// `excerpt` holds at most the first 500 bytes of the raw body with any
    /// card numbers masked.
    #[error(
        "XML syntax error in response from payment gateway. Here's the first 500 characters:\n{excerpt}"
    )]
    MalformedResponse {
        /// Leading bytes of the raw response, lossily decoded.
        excerpt: String,
    },

    /// The response reported a normal status but lacked a required element.
    #[error("response from payment gateway is missing <{0}>")]
    MissingField(&'static str),

    /// The gateway answered with a non-success HTTP status.
    #[error("payment gateway returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Leading bytes of the response body with card numbers masked.
        excerpt: String,
    },

    /// The request document could not be encoded.
    #[error("request document could not be encoded: {0}")]
    RequestEncoding(String),
}

/// The bank processed the transaction and declined it.
///
/// This is an expected business outcome. Display
/// [`response_text`](Self::response_text) to the cardholder.
///
/// # Examples
///
/// ```
/// use securepay::error::Decline;
///
/// let decline = Decline {
///     response_code: "51".to_owned(),
///     response_text: "Insufficient Funds".to_owned(),
///     transaction_id: Some("009887".to_owned()),
/// };
/// assert_eq!(decline.to_string(), "your card was declined: Insufficient Funds");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("your card was declined: {response_text}")]
pub struct Decline {
    /// Bank response code, opaque.
    pub response_code: String,
    /// Human-readable bank response text.
    pub response_text: String,
    /// Gateway transaction identifier, when the gateway assigned one.
    pub transaction_id: Option<String>,
}

/// Errors raised while building a client or loading its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid client configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration value is out of range or unsafe.
    #[error("invalid client configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_status_display() {
        let error = GatewayError::Status {
            code: "504".to_owned(),
            description: "Invalid merchant ID".to_owned(),
        };
        assert_eq!(error.to_string(), "Payment gateway error 504: Invalid merchant ID.");
    }

    #[test]
    fn test_malformed_response_display() {
        let error = GatewayError::MalformedResponse { excerpt: "<html>".to_owned() };
        assert!(error.to_string().ends_with("first 500 characters:\n<html>"));
    }

    #[test]
    fn test_decline_display() {
        let decline = Decline {
            response_code: "05".to_owned(),
            response_text: "Do Not Honour".to_owned(),
            transaction_id: None,
        };
        assert_eq!(decline.to_string(), "your card was declined: Do Not Honour");
    }

    #[test]
    fn test_error_kind() {
        let gateway = PaymentError::from(GatewayError::MissingField("approved"));
        assert_eq!(gateway.kind(), ErrorKind::Gateway);
        assert!(gateway.as_decline().is_none());

        let declined = PaymentError::from(Decline {
            response_code: "51".to_owned(),
            response_text: "Insufficient Funds".to_owned(),
            transaction_id: Some("1".to_owned()),
        });
        assert_eq!(declined.kind(), ErrorKind::Declined);
        assert_eq!(declined.as_decline().map(|d| d.response_code.as_str()), Some("51"));
        assert_eq!(declined.to_string(), "your card was declined: Insufficient Funds");
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::Invalid("timeout_secs must be between 1 and 300".to_owned());
        assert_eq!(
            error.to_string(),
            "invalid client configuration: timeout_secs must be between 1 and 300"
        );
    }
}
