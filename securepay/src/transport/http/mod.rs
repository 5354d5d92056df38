//! HTTP transport implementation using reqwest.

use reqwest::{Client, header::CONTENT_TYPE as CONTENT_TYPE_HEADER};
use tracing::instrument;
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{ConfigError, TransportError},
    transport::{CONTENT_TYPE, Transport, TransportResponse, sealed},
};

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Connection pooling and keep-alive come from the shared [`Client`]; cloning
/// the transport shares the pool.
///
/// # Examples
///
/// ```
/// use securepay::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig {
///     pool_max_idle_per_host: 4,
///     timeout_secs: 60,
///     connect_timeout_secs: 15,
///     http_version: HttpVersion::Http1,
/// };
///
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a transport with [`HttpConfig::default`].
    ///
    /// Default configuration:
    /// - Pool max idle per host: 10
    /// - Timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - HTTP version: Auto
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// The configuration is not validated here; see [`HttpConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if HTTP client creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(
        skip(self, body),
        fields(url = %url, body_len = body.len(), protocol = self.protocol_name())
    )]
    async fn execute_post(
        &self,
        url: &Url,
        body: &[u8],
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, response_len = body.len(), "gateway responded");

        Ok(TransportResponse { status, body })
    }
}

impl Transport for HttpTransport {
    async fn post<'a>(
        &'a self,
        url: &'a Url,
        body: &'a [u8],
    ) -> Result<TransportResponse, TransportError> {
        self.execute_post(url, body).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string, header, method, path},
    };

    use super::*;

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.protocol_name(), "http");
    }

    #[test]
    fn test_http_transport_protocol_name() {
        let http1 = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http1).unwrap().protocol_name(), "http/1.1");

        let http2 = HttpConfig { http_version: HttpVersion::Http2, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http2).unwrap().protocol_name(), "http/2");
    }

    #[test]
    fn test_http_transport_debug_format() {
        let transport = HttpTransport::new().unwrap();
        let debug_str = format!("{transport:?}");
        assert!(debug_str.contains("HttpTransport"));
    }

    #[tokio::test]
    async fn test_post_sends_xml_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xmlapi/payment"))
            .and(header("content-type", CONTENT_TYPE))
            .and(body_string("<SecurePayMessage/>"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/xmlapi/payment", server.uri())).unwrap();
        let transport = HttpTransport::new().unwrap();
        let response = transport.post(&url, b"<SecurePayMessage/>").await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"<ok/>");
    }

    #[tokio::test]
    async fn test_post_returns_error_status_as_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let transport = HttpTransport::new().unwrap();
        let response = transport.post(&url, b"<x/>").await.unwrap();

        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        assert_eq!(response.body, b"maintenance");
    }

    fn transport_from_toml(http_table: &str) -> HttpTransport {
        let config = crate::config::ClientConfig::from_toml(&format!("[http]\n{http_table}"))
            .unwrap();
        HttpTransport::with_config(&config.http).unwrap()
    }

    #[tokio::test]
    async fn test_configured_timeout_bounds_the_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let transport = transport_from_toml("timeout_secs = 1");
        let url = Url::parse(&server.uri()).unwrap();

        let started = std::time::Instant::now();
        let err = transport.post(&url, b"<x/>").await.unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_slow_answer_within_timeout_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<ok/>")
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let transport = transport_from_toml("timeout_secs = 5\nhttp_version = \"http1\"");
        let url = Url::parse(&server.uri()).unwrap();

        let response = transport.post(&url, b"<x/>").await.unwrap();
        assert_eq!(response.body, b"<ok/>");
        assert_eq!(transport.protocol_name(), "http/1.1");
    }

    #[tokio::test]
    async fn test_post_connection_refused() {
        // Bind then drop a listener so the port is closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = Url::parse(&format!("http://127.0.0.1:{port}/xmlapi/payment")).unwrap();
        let transport = HttpTransport::new().unwrap();

        let err = transport.post(&url, b"<x/>").await.unwrap_err();
        assert!(err.is_connect());
    }
}
