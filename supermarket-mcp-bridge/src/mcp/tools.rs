//! Product search tools.
//!
//! These functions hold the tool logic independent of the MCP runtime:
//! argument validation, adapter invocation and payload assembly. The
//! [`server`](super::server) module registers them with `rmcp`.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    error::{BridgeError, Result},
    mcp::models::{ProductList, ProductQuery},
    retailer::RetailerAdapter,
};

/// Arguments of `get_coles_products`.
///
/// Fields are read loosely so that a missing term or a malformed limit
/// reaches [`get_coles_products`] and comes back as a validation error
/// result instead of failing argument decoding.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetColesProductsParams {
    /// Product search term, e.g. "milk" or "Cadbury chocolate".
    #[serde(alias = "query")]
    #[schemars(required)]
    pub term: Option<String>,
    /// Maximum number of products to return (at least 1, default 10).
    #[serde(default)]
    #[schemars(with = "Option<u32>")]
    pub limit: Option<Value>,
    /// Coles store identifier. Defaults to the configured store.
    #[serde(default)]
    pub store_id: Option<String>,
}

/// Arguments of `get_woolworths_products`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWoolworthsProductsParams {
    /// Product search term, e.g. "milk" or "Cadbury chocolate".
    #[serde(alias = "query")]
    #[schemars(required)]
    pub term: Option<String>,
    /// Maximum number of products to return (at least 1, default 10).
    #[serde(default)]
    #[schemars(with = "Option<u32>")]
    pub limit: Option<Value>,
}

fn term_argument(term: Option<String>) -> Result<String> {
    term.ok_or_else(|| BridgeError::ValidationError("term is required".to_owned()))
}

/// Reads `limit` as a positive integer, given as a JSON number or a numeric
/// string. Values past `u32::MAX` saturate.
fn limit_argument(limit: Option<&Value>) -> Result<Option<u32>> {
    let value = match limit {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(0) | None => Err(BridgeError::ValidationError(format!(
            "limit must be a positive integer, got {value}"
        ))),
        Some(n) => Ok(Some(u32::try_from(n).unwrap_or(u32::MAX))),
    }
}

/// Searches Coles.
///
/// # Errors
///
/// Returns [`BridgeError::ValidationError`](crate::BridgeError::ValidationError)
/// for bad arguments, otherwise whatever the adapter reports.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use supermarket_mcp_bridge::{
///     config::{ColesConfig, EnvProvider},
///     mcp::tools::{GetColesProductsParams, get_coles_products},
///     retailer::ColesAdapter,
///     transport::ReqwestClient,
/// };
///
/// # async fn example() -> supermarket_mcp_bridge::Result<()> {
/// let adapter =
///     ColesAdapter::new(ReqwestClient::new()?, ColesConfig::default(), Arc::new(EnvProvider));
///
/// let params = GetColesProductsParams {
///     term: Some("milk".into()),
///     limit: Some(2_u32.into()),
///     store_id: Some("0584".into()),
/// };
/// let list = get_coles_products(&adapter, params).await?;
/// println!("{} products", list.count);
/// # Ok(())
/// # }
/// ```
pub async fn get_coles_products<A: RetailerAdapter>(
    adapter: &A,
    params: GetColesProductsParams,
) -> Result<ProductList> {
    let term = term_argument(params.term)?;
    let limit = limit_argument(params.limit.as_ref())?;
    let query = ProductQuery::new(term, limit)?.with_store_id(params.store_id)?;
    search_products(adapter, &query).await
}

/// Searches Woolworths.
///
/// # Errors
///
/// Returns [`BridgeError::ValidationError`](crate::BridgeError::ValidationError)
/// for bad arguments, otherwise whatever the adapter reports.
pub async fn get_woolworths_products<A: RetailerAdapter>(
    adapter: &A,
    params: GetWoolworthsProductsParams,
) -> Result<ProductList> {
    let term = term_argument(params.term)?;
    let limit = limit_argument(params.limit.as_ref())?;
    let query = ProductQuery::new(term, limit)?;
    search_products(adapter, &query).await
}

#[instrument(
    skip(adapter, query),
    fields(
        retailer = adapter.retailer().slug(),
        term = %query.term(),
        limit = query.limit(),
        request_id = %uuid::Uuid::new_v4(),
    )
)]
async fn search_products<A: RetailerAdapter>(
    adapter: &A,
    query: &ProductQuery,
) -> Result<ProductList> {
    match adapter.search(query).await {
        Ok(products) => {
            info!(count = products.len(), "product search succeeded");
            Ok(ProductList::new(adapter.retailer(), query, products))
        }
        Err(e) => {
            warn!(error = %e, kind = %e.kind(), "product search failed");
            Err(e)
        }
    }
}
