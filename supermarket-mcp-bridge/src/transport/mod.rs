//! Outbound HTTP abstraction.
//!
//! Retailer adapters never talk to reqwest directly. They build an
//! [`HttpRequest`], hand it to an [`HttpClient`], and interpret the returned
//! [`HttpResponse`]. Production code uses [`ReqwestClient`]; tests substitute
//! canned or recording clients so parsing can be exercised without network
//! access.
//!
//! # Examples
//!
//! ```rust,no_run
//! use supermarket_mcp_bridge::transport::{HttpClient, HttpRequest, ReqwestClient};
//! use url::Url;
//!
//! # async fn example() -> supermarket_mcp_bridge::Result<()> {
//! let client = ReqwestClient::new()?;
//! let url = Url::parse("https://www.woolworths.com.au/apis/ui/Search/products?searchTerm=milk")
//!     .expect("static URL");
//! let request = HttpRequest::get(url).header("Accept", "application/json");
//!
//! let response = client.get(&request).await?;
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

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::HttpConfig;
pub use http::ReqwestClient;

/// A GET request to a retailer endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL, query string included.
    pub url: Url,
    /// Additional headers, in insertion order.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a GET request without extra headers.
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self { url, headers: Vec::new() }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Looks up the first query parameter with the given name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url.query_pairs().find(|(key, _)| key == name).map(|(_, value)| value.into_owned())
    }
}

/// Response from a retailer endpoint.
///
/// Non-success statuses are returned as responses, not errors; adapters
/// decide how to report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues HTTP requests on behalf of retailer adapters.
///
/// Implementations only fail with [`BridgeError::HttpError`] when no
/// response was received at all; any status code is passed through.
///
/// [`BridgeError::HttpError`]: crate::error::BridgeError::HttpError
pub trait HttpClient: Send + Sync {
    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// Returns error if the request could not be sent or the body could not
    /// be read.
    fn get<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse>> + Send + 'a;
}
