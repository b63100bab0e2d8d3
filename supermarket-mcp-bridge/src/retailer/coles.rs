//! Coles product search.
//!
//! Coles serves search results from its storefront backend
//! (`/api/bff/products/search`), which requires a subscription key header.
//! The key is looked up through the [`ConfigProvider`] on every call, so a
//! missing key is reported per call and never prevents startup.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::{
    config::{ColesConfig, ConfigProvider},
    error::{BridgeError, Result},
    mcp::models::{ProductQuery, ProductRecord, Retailer},
    retailer::{RetailerAdapter, parse_json, success_body, take_count, unit::unit_from_text},
    transport::{HttpClient, HttpRequest},
};

/// Search path, relative to the configured base URL.
pub const SEARCH_PATH: &str = "/api/bff/products/search";

/// Result entry type for real products; other entries are ad tiles.
const PRODUCT_ENTRY_TYPE: &str = "PRODUCT";

/// Coles search response envelope.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<serde_json::Value>,
}

/// One product as returned by Coles.
#[derive(Debug, Deserialize)]
struct ColesProduct {
    #[serde(rename = "_type")]
    entry_type: Option<String>,
    name: Option<String>,
    brand: Option<String>,
    size: Option<String>,
    pricing: Option<ColesPricing>,
}

#[derive(Debug, Deserialize)]
struct ColesPricing {
    now: Option<Decimal>,
    unit: Option<ColesUnitPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColesUnitPrice {
    of_measure_units: Option<String>,
}

impl ColesProduct {
    fn is_product(&self) -> bool {
        self.entry_type.as_deref().is_none_or(|t| t.eq_ignore_ascii_case(PRODUCT_ENTRY_TYPE))
    }

    fn into_record(self) -> Option<ProductRecord> {
        let name = self.name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty())?;
        let name = match self.brand.as_deref().map(str::trim) {
            Some(brand) if !brand.is_empty() => format!("{brand} {name}"),
            _ => name,
        };

        let unit = self
            .pricing
            .as_ref()
            .and_then(|p| p.unit.as_ref())
            .and_then(|u| u.of_measure_units.as_deref())
            .and_then(|units| unit_from_text(units, true))
            .or_else(|| self.size.as_deref().and_then(|size| unit_from_text(size, false)));

        Some(ProductRecord {
            name,
            price: self.pricing.and_then(|p| p.now),
            retailer: Retailer::Coles,
            unit: unit.map(str::to_owned),
            size: self.size.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Coles adapter.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use supermarket_mcp_bridge::{
///     config::{ColesConfig, EnvProvider},
///     mcp::models::ProductQuery,
///     retailer::{ColesAdapter, RetailerAdapter},
///     transport::ReqwestClient,
/// };
///
/// # async fn example() -> supermarket_mcp_bridge::Result<()> {
/// let adapter = ColesAdapter::new(ReqwestClient::new()?, ColesConfig::default(), Arc::new(EnvProvider));
///
/// let query = ProductQuery::new("milk", Some(2))?.with_store_id(Some("0584".into()))?;
/// let products = adapter.search(&query).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ColesAdapter<C> {
    client: C,
    config: ColesConfig,
    secrets: Arc<dyn ConfigProvider>,
}

impl<C: HttpClient> ColesAdapter<C> {
    /// Creates an adapter.
    #[must_use]
    pub fn new(client: C, config: ColesConfig, secrets: Arc<dyn ConfigProvider>) -> Self {
        Self { client, config, secrets }
    }

    /// Looks up the subscription key.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if the key is unset or blank.
    pub fn api_key(&self) -> Result<String> {
        self.secrets.get(&self.config.api_key_env).ok_or_else(|| {
            BridgeError::ConfigError(format!(
                "{} is not set; a Coles API key is required to search Coles",
                self.config.api_key_env
            ))
        })
    }

    /// Builds the search request.
    ///
    /// The query's store id wins over the configured default; with neither,
    /// the store filter is omitted.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ConfigError`] if the base URL is invalid.
    pub fn build_request(&self, query: &ProductQuery, api_key: &str) -> Result<HttpRequest> {
        let mut url = search_url(&self.config.base_url)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(store_id) = query.store_id().or(self.config.default_store_id.as_deref()) {
                pairs.append_pair("storeId", store_id);
            }
            pairs
                .append_pair("searchTerm", query.term())
                .append_pair("start", "0")
                .append_pair("sortBy", "salesDescending")
                .append_pair("excludeAds", "true")
                .append_pair("authenticated", "false");
        }

        Ok(HttpRequest::get(url)
            .header("Accept", "application/json")
            .header(self.config.api_key_header.as_str(), api_key))
    }

    #[instrument(
        skip(self, query),
        fields(retailer = "coles", term = %query.term(), limit = query.limit(), store_id = query.store_id())
    )]
    async fn search_products(&self, query: &ProductQuery) -> Result<Vec<ProductRecord>> {
        let api_key = self.api_key().inspect_err(|_| {
            warn!(env_var = %self.config.api_key_env, "Coles API key missing, skipping request");
        })?;
        let request = self.build_request(query, &api_key)?;

        let response = self.client.get(&request).await?;
        let body = success_body(response)?;
        let products = parse_search_response(&body, query)?;

        info!(count = products.len(), "Coles search completed");
        Ok(products)
    }
}

impl<C: HttpClient> RetailerAdapter for ColesAdapter<C> {
    fn retailer(&self) -> Retailer {
        Retailer::Coles
    }

    fn search<'a>(
        &'a self,
        query: &'a ProductQuery,
    ) -> impl Future<Output = Result<Vec<ProductRecord>>> + Send + 'a {
        self.search_products(query)
    }
}

fn search_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url)
        .map_err(|e| BridgeError::ConfigError(format!("invalid Coles base_url '{base_url}': {e}")))?;
    base.join(SEARCH_PATH)
        .map_err(|e| BridgeError::ConfigError(format!("invalid Coles search URL: {e}")))
}

/// Maps a Coles search response body into at most `query.limit()` records.
///
/// # Errors
///
/// Returns [`BridgeError::ParseError`] if the body is not JSON or has no
/// `results` array.
pub fn parse_search_response(body: &[u8], query: &ProductQuery) -> Result<Vec<ProductRecord>> {
    let json = parse_json(Retailer::Coles, body)?;
    let response: SearchResponse = serde_json::from_value(json).map_err(|e| {
        BridgeError::ParseError(format!("Coles response has no product results: {e}"))
    })?;

    let products = response
        .results
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ColesProduct>(entry) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(error = %e, "skipping malformed Coles entry");
                None
            }
        })
        .filter(ColesProduct::is_product)
        .filter_map(ColesProduct::into_record)
        .take(take_count(query))
        .collect();

    Ok(products)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{config::StaticProvider, transport::testing::RecordingClient};

    fn product(name: &str, brand: &str, now: f64) -> serde_json::Value {
        json!({
            "_type": "PRODUCT",
            "id": 123,
            "name": name,
            "brand": brand,
            "size": "2L",
            "pricing": {
                "now": now,
                "unit": { "quantity": 1, "ofMeasureUnits": "l", "price": 1.55 },
                "comparable": "$1.55 per 1L"
            }
        })
    }

    fn ten_products() -> serde_json::Value {
        let results: Vec<_> =
            (0..10).map(|i| product(&format!("Milk {i}"), "Coles", 3.1 + f64::from(i))).collect();
        json!({ "noOfResults": 10, "results": results })
    }

    fn adapter_with_key(client: RecordingClient) -> ColesAdapter<RecordingClient> {
        let secrets = StaticProvider::new().with("COLES_API_KEY", "test-key");
        ColesAdapter::new(client, ColesConfig::default(), Arc::new(secrets))
    }

    #[test]
    fn test_build_request_with_store_id() {
        let adapter = adapter_with_key(RecordingClient::json(&json!({})));
        let query = ProductQuery::new("full cream milk", Some(2))
            .unwrap()
            .with_store_id(Some("123".to_owned()))
            .unwrap();

        let request = adapter.build_request(&query, "test-key").unwrap();

        assert_eq!(request.url.host_str(), Some("www.coles.com.au"));
        assert_eq!(request.url.path(), SEARCH_PATH);
        assert_eq!(request.query_param("storeId").as_deref(), Some("123"));
        assert_eq!(request.query_param("searchTerm").as_deref(), Some("full cream milk"));
        assert_eq!(request.query_param("excludeAds").as_deref(), Some("true"));
        assert_eq!(request.header_value("Ocp-Apim-Subscription-Key"), Some("test-key"));
    }

    #[test]
    fn test_build_request_uses_default_store() {
        let adapter = adapter_with_key(RecordingClient::json(&json!({})));
        let query = ProductQuery::new("bread", None).unwrap();

        let request = adapter.build_request(&query, "k").unwrap();
        assert_eq!(request.query_param("storeId").as_deref(), Some("0584"));
    }

    #[test]
    fn test_build_request_without_any_store() {
        let config = ColesConfig { default_store_id: None, ..ColesConfig::default() };
        let adapter = ColesAdapter::new(
            RecordingClient::json(&json!({})),
            config,
            Arc::new(StaticProvider::new()),
        );
        let query = ProductQuery::new("bread", None).unwrap();

        let request = adapter.build_request(&query, "k").unwrap();
        assert_eq!(request.query_param("storeId"), None);
    }

    #[test]
    fn test_build_request_custom_base_url() {
        let config = ColesConfig {
            base_url: "https://proxy.example.com/".to_owned(),
            ..ColesConfig::default()
        };
        let adapter = ColesAdapter::new(
            RecordingClient::json(&json!({})),
            config,
            Arc::new(StaticProvider::new()),
        );
        let query = ProductQuery::new("eggs", None).unwrap();

        let request = adapter.build_request(&query, "k").unwrap();
        assert_eq!(request.url.host_str(), Some("proxy.example.com"));
        assert_eq!(request.url.path(), "/api/bff/products/search");
    }

    #[test]
    fn test_parse_truncates_in_upstream_order() {
        let query = ProductQuery::new("milk", Some(2)).unwrap();
        let body = ten_products().to_string();

        let products = parse_search_response(body.as_bytes(), &query).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Coles Milk 0");
        assert_eq!(products[1].name, "Coles Milk 1");
        assert_eq!(products[0].price, Some(Decimal::new(31, 1)));
        assert_eq!(products[0].unit.as_deref(), Some("L"));
        assert_eq!(products[0].size.as_deref(), Some("2L"));
        assert!(products.iter().all(|p| p.retailer == Retailer::Coles));
    }

    #[test]
    fn test_parse_skips_ad_tiles() {
        let query = ProductQuery::new("milk", None).unwrap();
        let body = json!({
            "results": [
                { "_type": "SINGLE_TILE", "adId": "abc", "name": "Shop Dairy" },
                product("Lactose Free Milk", "Pauls", 4.5),
            ]
        });

        let products = parse_search_response(body.to_string().as_bytes(), &query).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Pauls Lactose Free Milk");
    }

    #[test]
    fn test_parse_product_without_price_or_brand() {
        let query = ProductQuery::new("bananas", None).unwrap();
        let body = json!({
            "results": [{ "_type": "PRODUCT", "name": "Bananas", "size": "per kg" }]
        });

        let products = parse_search_response(body.to_string().as_bytes(), &query).unwrap();
        assert_eq!(products[0].name, "Bananas");
        assert_eq!(products[0].price, None);
        assert_eq!(products[0].unit.as_deref(), Some("kg"));
    }

    #[test]
    fn test_parse_missing_results_is_parse_error() {
        let query = ProductQuery::new("milk", None).unwrap();
        let result = parse_search_response(br#"{"noOfResults": 0}"#, &query);
        assert!(matches!(result, Err(BridgeError::ParseError(_))));
    }

    #[test]
    fn test_parse_results_not_array_is_parse_error() {
        let query = ProductQuery::new("milk", None).unwrap();
        let result = parse_search_response(br#"{"results": "none"}"#, &query);
        assert!(matches!(result, Err(BridgeError::ParseError(_))));
    }

    #[test]
    fn test_parse_empty_results_is_success() {
        let query = ProductQuery::new("unobtainium", None).unwrap();
        let products = parse_search_response(br#"{"results": []}"#, &query).unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_api_key_makes_no_request() {
        let client = RecordingClient::json(&ten_products());
        let adapter =
            ColesAdapter::new(client, ColesConfig::default(), Arc::new(StaticProvider::new()));
        let query = ProductQuery::new("milk", None).unwrap();

        let result = adapter.search(&query).await;

        assert!(matches!(result, Err(BridgeError::ConfigError(_))));
        assert!(adapter.client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_milk_scenario() {
        let adapter = adapter_with_key(RecordingClient::json(&ten_products()));
        let query = ProductQuery::new("milk", Some(2))
            .unwrap()
            .with_store_id(Some("123".to_owned()))
            .unwrap();

        let products = adapter.search(&query).await.unwrap();

        assert_eq!(products.len(), 2);
        let requests = adapter.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query_param("storeId").as_deref(), Some("123"));
        assert_eq!(requests[0].header_value("Ocp-Apim-Subscription-Key"), Some("test-key"));
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let adapter = adapter_with_key(RecordingClient::responding(401, "Access denied"));
        let query = ProductQuery::new("milk", None).unwrap();

        let result = adapter.search(&query).await;
        assert!(matches!(result, Err(BridgeError::UpstreamError { status: 401, .. })));
    }
}
