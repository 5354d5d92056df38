//! Client configuration.
//!
//! Every field has a default, so an empty TOML document yields a working
//! configuration pointed at the public SecurePay endpoints.
//!
//! # Examples
//!
//! ```
//! use securepay::{config::ClientConfig, models::Environment};
//!
//! let config = ClientConfig::from_toml(
//!     r#"
//!     [http]
//!     timeout_secs = 45
//!
//!     [protocol]
//!     revision = "legacy"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.http.timeout_secs, 45);
//! assert_eq!(
//!     config.endpoints.url_for(Environment::Live).as_str(),
//!     "https://api.securepay.com.au/xmlapi/payment"
//! );
//! ```

use serde::Deserialize;
use url::Url;

use crate::{
    error::ConfigError, models::Environment, protocol::ProtocolConstants,
    transport::HttpConfig,
};

/// SecurePay test gateway endpoint.
pub const TEST_API_URL: &str = "https://test.securepay.com.au/xmlapi/payment";
/// SecurePay live gateway endpoint.
pub const LIVE_API_URL: &str = "https://api.securepay.com.au/xmlapi/payment";

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway URLs per environment.
    pub endpoints: EndpointConfig,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Protocol constants.
    pub protocol: ProtocolConstants,
}

impl ClientConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown enum
    /// values, and [`ConfigError::Invalid`] if [`validate`](Self::validate)
    /// fails.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints.validate()?;
        self.http.validate()?;
        self.protocol.validate()
    }
}

/// Gateway endpoint per [`Environment`].
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Test gateway URL.
    #[serde(default = "default_test_url")]
    pub test: Url,
    /// Live gateway URL.
    #[serde(default = "default_live_url")]
    pub live: Url,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { test: default_test_url(), live: default_live_url() }
    }
}

impl EndpointConfig {
    /// Returns the URL requests for `environment` are posted to.
    #[must_use]
    pub const fn url_for(&self, environment: Environment) -> &Url {
        match environment {
            Environment::Test => &self.test,
            Environment::Live => &self.live,
        }
    }

    /// Requires HTTPS endpoints that do not point at the local machine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("endpoints.test", &self.test)?;
        validate_url("endpoints.live", &self.live)
    }
}

fn validate_url(name: &str, url: &Url) -> Result<(), ConfigError> {
    if url.scheme() != "https" {
        return Err(ConfigError::Invalid(format!("{name} must use https, got {url}")));
    }

    if let Some(host) = url.host_str()
        && (host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]")
    {
        return Err(ConfigError::Invalid(format!("{name} must not point at localhost")));
    }

    Ok(())
}

#[allow(clippy::expect_used, reason = "constant URL is covered by unit tests")]
fn default_test_url() -> Url {
    Url::parse(TEST_API_URL).expect("TEST_API_URL is a valid URL")
}

#[allow(clippy::expect_used, reason = "constant URL is covered by unit tests")]
fn default_live_url() -> Url {
    Url::parse(LIVE_API_URL).expect("LIVE_API_URL is a valid URL")
}
