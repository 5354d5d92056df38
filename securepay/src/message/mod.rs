//! Request document construction.
//!
//! [`build_payment_request`] and [`build_refund_request`] are pure: given the
//! protocol constants, a timestamp and typed parameters they return a
//! [`RequestDocument`] holding the wire XML and a [`RedactedDocument`] copy safe
//! for logs. All values go through quick-xml's serializer, which escapes markup
//! characters, and any character outside XML 1.0 is rejected, so no field can
//! break the document structure.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use securepay::{
//!     message::build_payment_request,
//!     models::{MerchantCredentials, PaymentRequest},
//!     protocol::ProtocolConstants,
//! };
//!
//! # fn example() -> securepay::Result<()> {
//! let constants = ProtocolConstants::default();
//! let credentials = MerchantCredentials::new("MERCHANT ID", "PASSWORD");
//! let request = PaymentRequest::new(100, "1234", "4444333322221111", "11/22");
//! let timestamp = Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap();
//!
//! let document = build_payment_request(&constants, &timestamp, &credentials, &request)?;
//! assert!(document.as_str().contains("<cardNumber>4444333322221111</cardNumber>"));
//! assert!(document.redacted().as_str().contains("<cardNumber>444433...111</cardNumber>"));
//! # Ok(())
//! # }
//! ```

mod schema;

use std::fmt;

use chrono::{DateTime, TimeZone};
use quick_xml::se::Serializer;
use serde::Serialize;
use zeroize::Zeroize;

use self::schema::{
    CreditCardInfo, MerchantInfo, MessageInfo, PaymentSection, PaymentTxn, RefundTxn,
    SecurePayMessage, TxnList,
};
use crate::{
    error::GatewayError,
    models::{MerchantCredentials, PaymentRequest, RefundRequest},
    protocol::ProtocolConstants,
    timestamp::format_timestamp,
};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const ROOT_ELEMENT: &str = "SecurePayMessage";
const TXN_COUNT: &str = "1";
const TXN_ID: &str = "1";
const PASSWORD_MASK: &str = "********";

/// A serialized request ready for the transport.
///
/// `Debug` prints only the redacted copy. The wire bytes are zeroized on drop.
pub struct RequestDocument {
    wire: String,
    redacted: RedactedDocument,
}

impl RequestDocument {
    /// Wire XML, including the raw card number and password.
    ///
    /// Pass this to the transport only; log [`redacted`](Self::redacted) instead.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.wire
    }

    /// Wire XML as UTF-8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.wire.as_bytes()
    }

    /// Copy of the document with card number and password masked.
    #[must_use]
    pub const fn redacted(&self) -> &RedactedDocument {
        &self.redacted
    }
}

impl fmt::Debug for RequestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDocument").field("redacted", &self.redacted).finish_non_exhaustive()
    }
}

impl Drop for RequestDocument {
    fn drop(&mut self) {
        self.wire.zeroize();
    }
}

/// A request document with sensitive values masked.
///
/// The card number shows only its first six and last three digits and the
/// password is replaced by asterisks. Only the message builder can create one,
/// so anything typed `RedactedDocument` is safe to log.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedDocument(String);

impl RedactedDocument {
    /// The masked XML.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RedactedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RedactedDocument").field(&self.0).finish()
    }
}

impl fmt::Display for RedactedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds a payment request document.
///
/// The card number is sent as digits only. `recurring` is emitted as
/// `yes`/`no` when the protocol revision includes it. A missing cardholder
/// name is sent as an empty `cardHolderName` element.
///
/// # Errors
///
/// Returns [`GatewayError::RequestEncoding`] if serialization fails or a
/// field holds a character XML 1.0 does not allow, such as a control
/// character.
pub fn build_payment_request<Tz: TimeZone>(
    constants: &ProtocolConstants,
    timestamp: &DateTime<Tz>,
    credentials: &MerchantCredentials,
    request: &PaymentRequest,
) -> Result<RequestDocument, GatewayError> {
    let timestamp = format_timestamp(timestamp);
    let recurring = constants
        .revision
        .emits_recurring()
        .then_some(if request.recurring { "yes" } else { "no" });

    let payment_txn = |card_number| PaymentTxn {
        id: TXN_ID,
        txn_type: &constants.txn_type_payment,
        txn_source: &constants.txn_source,
        amount: request.amount,
        currency: &constants.currency,
        recurring,
        purchase_order_no: &request.purchase_order_id,
        credit_card_info: CreditCardInfo {
            card_number,
            expiry_date: &request.card_expiry,
            card_holder_name: request.cardholder_name.as_deref().unwrap_or_default(),
        },
    };

    let wire = serialize(&envelope(
        constants,
        &timestamp,
        credentials.merchant_id(),
        credentials.expose_password(),
        payment_txn(request.card_number.expose_digits()),
    ))?;

    let masked_card = request.card_number.masked();
    let redacted = serialize(&envelope(
        constants,
        &timestamp,
        credentials.merchant_id(),
        PASSWORD_MASK,
        payment_txn(&masked_card),
    ))?;

    Ok(RequestDocument { wire, redacted: RedactedDocument(redacted) })
}

/// Builds a refund request document.
///
/// Refunds carry no card details and no currency.
///
/// # Errors
///
/// Returns [`GatewayError::RequestEncoding`] if serialization fails or a
/// field holds a character XML 1.0 does not allow.
pub fn build_refund_request<Tz: TimeZone>(
    constants: &ProtocolConstants,
    timestamp: &DateTime<Tz>,
    credentials: &MerchantCredentials,
    request: &RefundRequest,
) -> Result<RequestDocument, GatewayError> {
    let timestamp = format_timestamp(timestamp);
    let refund_txn = || RefundTxn {
        id: TXN_ID,
        txn_type: &constants.txn_type_refund,
        txn_source: &constants.txn_source,
        amount: request.amount,
        purchase_order_no: &request.purchase_order_id,
        txn_id: &request.transaction_id,
    };

    let wire = serialize(&envelope(
        constants,
        &timestamp,
        credentials.merchant_id(),
        credentials.expose_password(),
        refund_txn(),
    ))?;
    let redacted = serialize(&envelope(
        constants,
        &timestamp,
        credentials.merchant_id(),
        PASSWORD_MASK,
        refund_txn(),
    ))?;

    Ok(RequestDocument { wire, redacted: RedactedDocument(redacted) })
}

fn envelope<'a, T>(
    constants: &'a ProtocolConstants,
    timestamp: &'a str,
    merchant_id: &'a str,
    password: &'a str,
    txn: T,
) -> SecurePayMessage<'a, T> {
    SecurePayMessage {
        message_info: MessageInfo {
            message_id: "",
            message_timestamp: timestamp,
            timeout_value: constants.timeout_value,
            api_version: &constants.api_version,
        },
        merchant_info: MerchantInfo { merchant_id, password },
        request_type: &constants.request_type,
        payment: PaymentSection { txn_list: TxnList { count: TXN_COUNT, txn } },
    }
}

fn serialize<T: Serialize>(message: &T) -> Result<String, GatewayError> {
    let mut body = String::from(XML_DECLARATION);
    let mut serializer = Serializer::with_root(&mut body, Some(ROOT_ELEMENT))
        .map_err(|e| GatewayError::RequestEncoding(e.to_string()))?;
    serializer.indent(' ', 2);
    message.serialize(serializer).map_err(|e| GatewayError::RequestEncoding(e.to_string()))?;
    if let Some(c) = body.chars().find(|&c| !is_xml_char(c)) {
        return Err(GatewayError::RequestEncoding(format!(
            "field value contains U+{:04X}, which XML 1.0 does not allow",
            u32::from(c)
        )));
    }
    body.push('\n');
    Ok(body)
}

/// The XML 1.0 `Char` production. Surrogates cannot occur in a `char`.
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
