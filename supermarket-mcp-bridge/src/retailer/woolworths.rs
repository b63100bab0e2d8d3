//! Woolworths product search.
//!
//! Woolworths exposes the JSON search endpoint its own storefront uses. It
//! needs no credential but rejects clients that do not look like a browser.
//!
//! The response nests products one level deep: `Products` is a list of
//! groups, each with its own `Products` list. Some entries are bare products
//! instead of groups; they are recognized by a `Stockcode` field.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use crate::{
    config::WoolworthsConfig,
    error::{BridgeError, Result},
    mcp::models::{ProductQuery, ProductRecord, Retailer},
    retailer::{RetailerAdapter, parse_json, success_body, take_count, unit::SizeHints},
    transport::{HttpClient, HttpRequest},
};

/// Search path, relative to the configured base URL.
pub const SEARCH_PATH: &str = "/apis/ui/Search/products";

/// One product as returned by Woolworths.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WoolworthsProduct {
    display_name: Option<String>,
    name: Option<String>,
    price: Option<Decimal>,
    instore_price: Option<Decimal>,
    was_price: Option<Decimal>,
    package_size: Option<String>,
    cup_string: Option<String>,
    cup_measure: Option<String>,
    unit: Option<String>,
}

impl WoolworthsProduct {
    /// Returns `None` when neither `DisplayName` nor `Name` carries text.
    fn into_record(self) -> Option<ProductRecord> {
        let unit = SizeHints {
            package_size: self.package_size.as_deref(),
            cup_string: self.cup_string.as_deref(),
            cup_measure: self.cup_measure.as_deref(),
            unit: self.unit.as_deref(),
        }
        .infer();

        let name = [self.display_name, self.name]
            .into_iter()
            .flatten()
            .map(|n| n.trim().to_owned())
            .find(|n| !n.is_empty())?;

        Some(ProductRecord {
            name,
            price: self.price.or(self.instore_price).or(self.was_price),
            retailer: Retailer::Woolworths,
            unit: unit.map(str::to_owned),
            size: self.package_size.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Woolworths adapter.
///
/// # Examples
///
/// ```rust,no_run
/// use supermarket_mcp_bridge::{
///     config::WoolworthsConfig,
///     mcp::models::ProductQuery,
///     retailer::{RetailerAdapter, WoolworthsAdapter},
///     transport::ReqwestClient,
/// };
///
/// # async fn example() -> supermarket_mcp_bridge::Result<()> {
/// let adapter = WoolworthsAdapter::new(ReqwestClient::new()?, WoolworthsConfig::default());
///
/// let query = ProductQuery::new("Cadbury chocolate", Some(5))?;
/// for product in adapter.search(&query).await? {
///     println!("{}: {:?}", product.name, product.price);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WoolworthsAdapter<C> {
    client: C,
    config: WoolworthsConfig,
}

impl<C: HttpClient> WoolworthsAdapter<C> {
    /// Creates an adapter.
    #[must_use]
    pub const fn new(client: C, config: WoolworthsConfig) -> Self {
        Self { client, config }
    }

    /// Builds the search request.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if the base URL is invalid.
    pub fn build_request(&self, query: &ProductQuery) -> Result<HttpRequest> {
        let base = Url::parse(&self.config.base_url).map_err(|e| {
            BridgeError::ConfigError(format!(
                "invalid Woolworths base_url '{}': {e}",
                self.config.base_url
            ))
        })?;
        let mut url = base
            .join(SEARCH_PATH)
            .map_err(|e| BridgeError::ConfigError(format!("invalid Woolworths search URL: {e}")))?;
        url.query_pairs_mut().append_pair("searchTerm", query.term());

        Ok(HttpRequest::get(url)
            .header("Accept", "application/json")
            .header("User-Agent", self.config.user_agent.as_str()))
    }

    #[instrument(
        skip(self, query),
        fields(retailer = "woolworths", term = %query.term(), limit = query.limit())
    )]
    async fn search_products(&self, query: &ProductQuery) -> Result<Vec<ProductRecord>> {
        let request = self.build_request(query)?;

        let response = self.client.get(&request).await?;
        let body = success_body(response)?;
        let products = parse_search_response(&body, query)?;

        info!(count = products.len(), "Woolworths search completed");
        Ok(products)
    }
}

impl<C: HttpClient> RetailerAdapter for WoolworthsAdapter<C> {
    fn retailer(&self) -> Retailer {
        Retailer::Woolworths
    }

    fn search<'a>(
        &'a self,
        query: &'a ProductQuery,
    ) -> impl Future<Output = Result<Vec<ProductRecord>>> + Send + 'a {
        self.search_products(query)
    }
}

/// Maps a Woolworths search response body into at most `query.limit()`
/// records.
///
/// A `null` `Products` value means no matches.
///
/// # Errors
///
/// Returns [`BridgeError::ParseError`] if the body is not JSON, has no
/// `Products` key, or `Products` is neither a list nor `null`.
pub fn parse_search_response(body: &[u8], query: &ProductQuery) -> Result<Vec<ProductRecord>> {
    let json = parse_json(Retailer::Woolworths, body)?;
    let entries = match json.get("Products") {
        None => {
            return Err(BridgeError::ParseError(
                "Woolworths response has no Products field".to_owned(),
            ));
        }
        Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(serde_json::Value::Array(entries)) => entries,
        Some(other) => {
            return Err(BridgeError::ParseError(format!(
                "Woolworths Products field is not a list: {other}"
            )));
        }
    };

    let products = entries
        .iter()
        .flat_map(products_in_entry)
        .filter_map(|product| match WoolworthsProduct::deserialize(product) {
            Ok(product) => {
                let record = product.into_record();
                if record.is_none() {
                    debug!("skipping nameless Woolworths product");
                }
                record
            }
            Err(e) => {
                debug!(error = %e, "skipping malformed Woolworths product");
                None
            }
        })
        .take(take_count(query))
        .collect();

    Ok(products)
}

/// Products carried by one top-level entry: the nested list of a group, the
/// entry itself when it is a bare product, nothing otherwise.
fn products_in_entry(entry: &serde_json::Value) -> &[serde_json::Value] {
    match entry.get("Products") {
        Some(serde_json::Value::Array(nested)) => nested,
        None if entry.get("Stockcode").is_some() => std::slice::from_ref(entry),
        _ => &[],
    }
}
