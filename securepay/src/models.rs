//! Request and result types exchanged with callers.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::card::CardNumber;

/// Merchant login supplied with every request.
///
/// The password is held as a [`SecretString`] and never appears in `Debug`
/// output or diagnostic logs.
///
/// # Examples
///
/// ```
/// use securepay::models::MerchantCredentials;
///
/// let credentials = MerchantCredentials::new("ABC0001", "abc123");
/// assert_eq!(credentials.merchant_id(), "ABC0001");
/// assert!(!format!("{credentials:?}").contains("abc123"));
/// ```
#[derive(Clone)]
pub struct MerchantCredentials {
    merchant_id: String,
    password: SecretString,
}

impl MerchantCredentials {
    /// Creates credentials from a merchant ID and password.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(merchant_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self { merchant_id: merchant_id.into(), password: SecretString::from(password.into()) }
    }

    /// Merchant identifier.
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub(crate) fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A card payment.
///
/// `amount` is in the minor unit of the configured currency (cents for AUD).
/// Note that the test gateway only approves amounts ending in `00` or `08`;
/// other endings are declined with the matching bank response code.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    /// Amount in minor currency units.
    pub amount: u64,
    /// Caller's reference for the transaction, such as an invoice number.
    pub purchase_order_id: String,
    /// Card number; separators are already stripped.
    pub card_number: CardNumber,
    /// Card expiry as `MM/YY`. Not validated locally.
    pub card_expiry: String,
    /// Name on the card.
    pub cardholder_name: Option<String>,
    /// Marks the payment as recurring. This changes how the bank authorises
    /// the payment (typically ignoring expiry and CVV); it does not schedule
    /// anything.
    pub recurring: bool,
}

impl PaymentRequest {
    /// Creates a one-off payment without a cardholder name.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(
        amount: u64,
        purchase_order_id: impl Into<String>,
        card_number: impl Into<CardNumber>,
        card_expiry: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            purchase_order_id: purchase_order_id.into(),
            card_number: card_number.into(),
            card_expiry: card_expiry.into(),
            cardholder_name: None,
            recurring: false,
        }
    }

    /// Sets the cardholder name.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for builder methods"
    )]
    pub fn with_cardholder_name(mut self, name: impl Into<String>) -> Self {
        self.cardholder_name = Some(name.into());
        self
    }

    /// Sets the recurring flag.
    #[must_use]
    pub const fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }
}

/// A refund of an earlier payment.
///
/// `purchase_order_id` must be the same value the original payment used; the
/// gateway, not this client, checks that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundRequest {
    /// Amount to refund in minor currency units.
    pub amount: u64,
    /// Purchase order ID of the original payment.
    pub purchase_order_id: String,
    /// Gateway transaction ID of the original payment.
    pub transaction_id: String,
}

impl RefundRequest {
    /// Creates a refund request.
    #[must_use]
    #[allow(
        clippy::impl_trait_in_params,
        reason = "impl Into<String> is idiomatic for constructors"
    )]
    pub fn new(
        amount: u64,
        purchase_order_id: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            purchase_order_id: purchase_order_id.into(),
            transaction_id: transaction_id.into(),
        }
    }
}

/// Normalized result of an approved payment or refund.
///
/// Store `transaction_id` so the payment can be refunded or looked up later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentResponse {
    /// Always `true` for results returned from `pay`/`refund`; declines are
    /// reported as [`Decline`](crate::error::Decline) errors.
    pub approved: bool,
    /// Bank response code, opaque (e.g. `"00"`, `"08"`).
    pub bank_response_code: String,
    /// Human-readable bank response.
    pub bank_response_text: String,
    /// Gateway transaction identifier.
    pub transaction_id: Option<String>,
}

/// Gateway environment a request is sent to.
///
/// There is no default: callers pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// SecurePay test gateway.
    Test,
    /// SecurePay live gateway; real cards are charged.
    Live,
}

impl Environment {
    /// Lower-case name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = MerchantCredentials::new("MERCHANT ID", "PASSWORD");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("MERCHANT ID"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("PASSWORD"));
        assert_eq!(credentials.expose_password(), "PASSWORD");
    }

    #[test]
    fn test_payment_request_builder() {
        let request = PaymentRequest::new(100, "1234", "4444 3333 2222 1111", "11/22")
            .with_cardholder_name("Test Person")
            .with_recurring(true);

        assert_eq!(request.amount, 100);
        assert_eq!(request.purchase_order_id, "1234");
        assert_eq!(request.card_number.expose_digits(), "4444333322221111");
        assert_eq!(request.cardholder_name.as_deref(), Some("Test Person"));
        assert!(request.recurring);
    }

    #[test]
    fn test_payment_request_debug_masks_card() {
        let request = PaymentRequest::new(100, "1234", "4444333322221111", "11/22");
        let debug = format!("{request:?}");
        assert!(!debug.contains("4444333322221111"));
        assert!(debug.contains("444433...111"));
    }

    #[test]
    fn test_refund_request() {
        let request = RefundRequest::new(100, "1234", "4321");
        assert_eq!(request.transaction_id, "4321");
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Test.to_string(), "test");
        assert_eq!(Environment::Live.as_str(), "live");
    }
}
