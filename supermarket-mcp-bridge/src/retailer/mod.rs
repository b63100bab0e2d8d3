//! Retailer adapters.
//!
//! Each adapter turns a [`ProductQuery`] into one request against its
//! retailer's search endpoint and maps the retailer-specific JSON into
//! [`ProductRecord`]s, truncated to the query limit in upstream order.
//!
//! | Retailer   | Adapter               | Credential      | Store filter |
//! |------------|-----------------------|-----------------|--------------|
//! | Coles      | [`ColesAdapter`]      | `COLES_API_KEY` | yes          |
//! | Woolworths | [`WoolworthsAdapter`] | none            | no           |

use crate::{
    error::{BridgeError, Result},
    mcp::models::{ProductQuery, ProductRecord, Retailer},
    transport::HttpResponse,
};

pub mod coles;
pub mod unit;
pub mod woolworths;

pub use coles::ColesAdapter;
pub use woolworths::WoolworthsAdapter;

/// A source of normalized product records.
///
/// Every record an adapter returns carries [`RetailerAdapter::retailer`], and
/// a search never returns more than `query.limit()` records.
pub trait RetailerAdapter: Send + Sync {
    /// Retailer served by this adapter.
    fn retailer(&self) -> Retailer;

    /// Searches the retailer's catalog.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] when a required credential is
    /// missing, [`BridgeError::HttpError`] or [`BridgeError::UpstreamError`]
    /// when the retailer is unreachable or rejects the request, and
    /// [`BridgeError::ParseError`] when the response has an unexpected shape.
    fn search<'a>(
        &'a self,
        query: &'a ProductQuery,
    ) -> impl Future<Output = Result<Vec<ProductRecord>>> + Send + 'a;
}

/// Returns the body of a 2xx response, or an [`BridgeError::UpstreamError`].
pub(crate) fn success_body(response: HttpResponse) -> Result<Vec<u8>> {
    if !response.is_success() {
        return Err(BridgeError::upstream(response.status, &response.body));
    }
    Ok(response.body)
}

/// Parses a response body as JSON.
pub(crate) fn parse_json(retailer: Retailer, body: &[u8]) -> Result<serde_json::Value> {
    serde_json::from_slice(body)
        .map_err(|e| BridgeError::ParseError(format!("{retailer} returned invalid JSON: {e}")))
}

/// Converts a limit into a `take` count.
pub(crate) fn take_count(query: &ProductQuery) -> usize {
    usize::try_from(query.limit()).unwrap_or(usize::MAX)
}
