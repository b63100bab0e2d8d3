//! reqwest-backed [`HttpClient`].

use reqwest::Client;
use tracing::{debug, instrument};

use super::config::HttpConfig;
use crate::{
    error::{BridgeError, Result},
    transport::{HttpClient, HttpRequest, HttpResponse},
};

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(BridgeError::ValidationError(
            "invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(BridgeError::ValidationError(
            "invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// HTTP client used in production.
///
/// Cloning is cheap; clones share one connection pool.
///
/// # Examples
///
/// ```
/// use supermarket_mcp_bridge::transport::{HttpConfig, ReqwestClient};
///
/// let config = HttpConfig { timeout_secs: 15, ..HttpConfig::default() };
/// let client = ReqwestClient::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Creates a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a client with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(BridgeError::HttpError)?;

        Ok(Self { client })
    }

    #[instrument(skip(self, request), fields(host = request.url.host_str(), path = request.url.path()))]
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.get(request.url.clone());
        for (name, value) in &request.headers {
            validate_header(name, value)?;
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "retailer responded");

        Ok(HttpResponse { status, body })
    }
}

impl HttpClient for ReqwestClient {
    fn get<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse>> + Send + 'a {
        self.execute(request)
    }
}
