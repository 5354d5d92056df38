//! HTTP transport configuration.
//!
//! These values govern the client socket only. The `timeoutValue` sent inside
//! each request document is a separate gateway-side setting in
//! [`ProtocolConstants`](crate::protocol::ProtocolConstants).

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_POOL_MAX_IDLE: usize = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;
const CONNECT_TIMEOUT_RANGE: RangeInclusive<u64> = 1..=60;

/// Socket settings for [`HttpTransport`](super::HttpTransport).
///
/// Read from the `[http]` table of the client configuration. Omitted keys keep
/// their defaults.
///
/// ```toml
/// [http]
/// timeout_secs = 45
/// connect_timeout_secs = 5
/// http_version = "http1"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Idle keep-alive connections kept open to the gateway host.
    pub pool_max_idle_per_host: usize,

    /// Bound on one payment call in seconds, from connect to the last body
    /// byte. On expiry the outcome of the charge is unknown.
    pub timeout_secs: u64,

    /// Bound on establishing the TCP and TLS connection, in seconds.
    pub connect_timeout_secs: u64,

    /// Which HTTP version to speak to the gateway.
    pub http_version: HttpVersion,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            http_version: HttpVersion::default(),
        }
    }
}

impl HttpConfig {
    /// Checks both timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `timeout_secs` is outside 1-300 or
    /// `connect_timeout_secs` is outside 1-60.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("http.timeout_secs", self.timeout_secs, &TIMEOUT_RANGE)?;
        check_range("http.connect_timeout_secs", self.connect_timeout_secs, &CONNECT_TIMEOUT_RANGE)
    }

    /// [`timeout_secs`](Self::timeout_secs) as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// [`connect_timeout_secs`](Self::connect_timeout_secs) as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn check_range(key: &str, value: u64, range: &RangeInclusive<u64>) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{key} must be between {} and {}",
            range.start(),
            range.end()
        )))
    }
}

/// HTTP version spoken to the gateway.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1.
    Http1,
    /// HTTP/2 without ALPN negotiation.
    Http2,
    /// Whatever TLS negotiation settles on.
    #[default]
    Auto,
}
