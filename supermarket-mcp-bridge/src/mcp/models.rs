//! Product search data models.
//!
//! [`ProductQuery`] is the validated input of a search, [`ProductRecord`] the
//! normalized output unit shared by every retailer, and [`ProductList`] the
//! payload a successful tool call returns.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Number of products returned when a call does not set `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Supported retailers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    /// Coles Supermarkets.
    Coles,
    /// Woolworths Supermarkets.
    Woolworths,
}

impl Retailer {
    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Coles => "Coles",
            Self::Woolworths => "Woolworths",
        }
    }

    /// Lowercase identifier used in payloads and logs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Coles => "coles",
            Self::Woolworths => "woolworths",
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A validated product search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    term: String,
    limit: u32,
    store_id: Option<String>,
}

impl ProductQuery {
    /// Builds a query, applying [`DEFAULT_LIMIT`] when `limit` is `None`.
    ///
    /// The term is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ValidationError`] if the term is blank or the
    /// limit is 0. There is no upper bound; adapters return what they have.
    ///
    /// # Examples
    ///
    /// ```
    /// use supermarket_mcp_bridge::mcp::models::ProductQuery;
    ///
    /// let query = ProductQuery::new("  milk ", None).unwrap();
    /// assert_eq!(query.term(), "milk");
    /// assert_eq!(query.limit(), 10);
    ///
    /// assert!(ProductQuery::new("milk", Some(0)).is_err());
    /// ```
    pub fn new(term: impl Into<String>, limit: Option<u32>) -> Result<Self> {
        let term = term.into();
        let term = term.trim();
        if term.is_empty() {
            return Err(BridgeError::ValidationError("term must not be empty".to_owned()));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(BridgeError::ValidationError("limit must be at least 1".to_owned()));
        }

        Ok(Self { term: term.to_owned(), limit, store_id: None })
    }

    /// Restricts the search to one store. `None` keeps the retailer default.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ValidationError`] if the store id is blank.
    pub fn with_store_id(mut self, store_id: Option<String>) -> Result<Self> {
        if let Some(store_id) = store_id {
            let store_id = store_id.trim();
            if store_id.is_empty() {
                return Err(BridgeError::ValidationError(
                    "store_id must not be empty when provided".to_owned(),
                ));
            }
            self.store_id = Some(store_id.to_owned());
        }
        Ok(self)
    }

    /// Search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Maximum number of records to return.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Store requested by the caller.
    #[must_use]
    pub fn store_id(&self) -> Option<&str> {
        self.store_id.as_deref()
    }
}

/// One product, normalized across retailers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name as shown by the retailer.
    pub name: String,
    /// Current shelf price in AUD, when the retailer reported one.
    pub price: Option<Decimal>,
    /// Retailer the record came from.
    pub retailer: Retailer,
    /// Measurement unit (`kg`, `g`, `L`, `ml`, `each`, `pack`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Package size text, e.g. `2L` or `180g`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Successful tool payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    /// Retailer that was searched.
    pub retailer: Retailer,
    /// Search term used.
    pub query: String,
    /// Number of products returned.
    pub count: usize,
    /// Products, in retailer order.
    pub products: Vec<ProductRecord>,
}

impl ProductList {
    /// Wraps adapter output.
    #[must_use]
    pub fn new(retailer: Retailer, query: &ProductQuery, products: Vec<ProductRecord>) -> Self {
        Self { retailer, query: query.term().to_owned(), count: products.len(), products }
    }
}
