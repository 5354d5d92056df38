//! Wire diagnostics.
//!
//! The client reports every request it sends and every response it parses to a
//! [`DiagnosticLogger`]. The request side of the trait only accepts a
//! [`RedactedDocument`], which the message builder alone can produce, so a
//! logger implementation cannot receive a raw card number or password.

use std::fmt;

use crate::{message::RedactedDocument, response::TransactionResult};

/// Tracing target used by [`TracingLogger`].
pub const WIRE_TARGET: &str = "securepay::wire";

/// Sink for wire-level diagnostics.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
///
/// use securepay::{
///     diagnostics::DiagnosticLogger, message::RedactedDocument, response::TransactionResult,
/// };
///
/// #[derive(Debug, Default)]
/// struct CountingLogger {
///     requests: Mutex<usize>,
/// }
///
/// impl DiagnosticLogger for CountingLogger {
///     fn request(&self, _document: &RedactedDocument) {
///         if let Ok(mut requests) = self.requests.lock() {
///             *requests += 1;
///         }
///     }
///
///     fn response(&self, _result: &TransactionResult) {}
/// }
/// ```
pub trait DiagnosticLogger: Send + Sync + fmt::Debug {
    /// Called with the masked request document just before it is sent.
    fn request(&self, document: &RedactedDocument);

    /// Called with the parsed outcome of a normally processed response.
    fn response(&self, result: &TransactionResult);
}

/// Default logger emitting `DEBUG` events under [`WIRE_TARGET`].
///
/// Enable with `RUST_LOG=securepay::wire=debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl DiagnosticLogger for TracingLogger {
    fn request(&self, document: &RedactedDocument) {
        tracing::debug!(target: WIRE_TARGET, document = %document, "request document");
    }

    fn response(&self, result: &TransactionResult) {
        tracing::debug!(
            target: WIRE_TARGET,
            status_code = %result.status_code,
            status_description = %result.status_description,
            approved = result.approved,
            response_code = %result.response_code,
            response_text = %result.response_text,
            transaction_id = ?result.transaction_id,
            "response parsed"
        );
    }
}
