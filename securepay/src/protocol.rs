//! Fixed protocol values shared by every request.
//!
//! [`ProtocolConstants`] is built once (usually as part of
//! [`ClientConfig`](crate::config::ClientConfig)) and passed by reference into the
//! message builder and response parser. Nothing here is mutated after start-up.

use serde::Deserialize;

use crate::error::ConfigError;

/// Revision of the Secure XML message layout.
///
/// The gateway accepted two incompatible payment layouts over time; the
/// revision decides which one the builder emits.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolRevision {
    /// Original layout: no `recurring` element in payments.
    Legacy,
    /// Current layout: payments carry `recurring` (`yes`/`no`).
    #[default]
    Recurring,
}

impl ProtocolRevision {
    /// Whether payment transactions include the `recurring` element.
    #[must_use]
    pub const fn emits_recurring(self) -> bool {
        matches!(self, Self::Recurring)
    }
}

/// Immutable protocol constants.
///
/// Defaults match the published Secure XML API (`xml-4.2`, AUD, source `23`).
///
/// # Examples
///
/// ```
/// use securepay::protocol::{ProtocolConstants, ProtocolRevision};
///
/// let constants = ProtocolConstants::default();
/// assert_eq!(constants.api_version, "xml-4.2");
/// assert_eq!(constants.normal_status_code, "000");
///
/// let legacy = ProtocolConstants { revision: ProtocolRevision::Legacy, ..Default::default() };
/// assert!(!legacy.revision.emits_recurring());
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProtocolConstants {
    /// Gateway-side session timeout sent in `timeoutValue`, in seconds.
    ///
    /// Does not affect client socket behaviour; see
    /// [`HttpConfig`](crate::config::HttpConfig) for that.
    pub timeout_value: u32,
    /// Value of `apiVersion`.
    pub api_version: String,
    /// Value of `RequestType`.
    pub request_type: String,
    /// `txnType` for payments.
    pub txn_type_payment: String,
    /// `txnType` for refunds.
    pub txn_type_refund: String,
    /// `txnSource` for Secure XML.
    pub txn_source: String,
    /// ISO 4217 currency of every payment; amounts are in its minor unit.
    pub currency: String,
    /// Status code the gateway uses for a normally processed message.
    pub normal_status_code: String,
    /// Message layout revision.
    pub revision: ProtocolRevision,
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self {
            timeout_value: 60,
            api_version: "xml-4.2".to_owned(),
            request_type: "Payment".to_owned(),
            txn_type_payment: "0".to_owned(),
            txn_type_refund: "4".to_owned(),
            txn_source: "23".to_owned(),
            currency: "AUD".to_owned(),
            normal_status_code: "000".to_owned(),
            revision: ProtocolRevision::default(),
        }
    }
}

impl ProtocolConstants {
    /// Checks that no protocol code is blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first empty field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("api_version", &self.api_version),
            ("request_type", &self.request_type),
            ("txn_type_payment", &self.txn_type_payment),
            ("txn_type_refund", &self.txn_type_refund),
            ("txn_source", &self.txn_source),
            ("currency", &self.currency),
            ("normal_status_code", &self.normal_status_code),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("protocol.{name} must not be empty")));
        }
        if self.txn_type_payment == self.txn_type_refund {
            return Err(ConfigError::Invalid(
                "protocol.txn_type_payment and protocol.txn_type_refund must differ".to_owned(),
            ));
        }
        Ok(())
    }
}
