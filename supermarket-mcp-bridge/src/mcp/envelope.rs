//! Conversion of tool outcomes into MCP call results.
//!
//! A tool never fails at the protocol level. Successes become a text block
//! plus the JSON [`ProductList`]; failures become an error result carrying an
//! [`ErrorPayload`], so the agent sees the reason and the session survives.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::{
    error::{BridgeError, ErrorKind, Result},
    mcp::models::{ProductList, Retailer},
};

/// Separator between products in the text rendering.
const PRODUCT_SEPARATOR: &str = "\n---\n";

/// Error body returned to the agent.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Error category.
    pub kind: ErrorKind,
    /// Retailer the failing tool targets.
    pub retailer: Retailer,
    /// Human-readable description.
    pub message: String,
}

impl ErrorPayload {
    /// Builds the payload for a failed search.
    #[must_use]
    pub fn new(retailer: Retailer, error: &BridgeError) -> Self {
        Self { kind: error.kind(), retailer, message: error.to_string() }
    }
}

/// Renders a product list as plain text.
///
/// # Examples
///
/// ```
/// use supermarket_mcp_bridge::mcp::{
///     envelope::render_text,
///     models::{ProductList, ProductQuery, Retailer},
/// };
///
/// let query = ProductQuery::new("xyzzy", None).unwrap();
/// let list = ProductList::new(Retailer::Woolworths, &query, vec![]);
/// assert_eq!(render_text(&list), "No products found at Woolworths for 'xyzzy'.");
/// ```
#[must_use]
pub fn render_text(list: &ProductList) -> String {
    if list.products.is_empty() {
        return format!("No products found at {} for '{}'.", list.retailer, list.query);
    }

    list.products
        .iter()
        .map(|product| {
            let price = product.price.map_or_else(|| "N/A".to_owned(), |p| format!("${p:.2}"));
            let unit = product.unit.as_deref().unwrap_or("N/A");
            format!(
                "Name: {}\nPrice: {price}\nUnit: {unit}\nStore: {}",
                product.name,
                product.retailer.slug()
            )
        })
        .collect::<Vec<_>>()
        .join(PRODUCT_SEPARATOR)
}

/// Converts a search outcome into the tool result returned to `rmcp`.
///
/// # Errors
///
/// Returns [`McpError`] only if a payload cannot be serialized.
pub fn into_call_tool_result(
    retailer: Retailer,
    outcome: Result<ProductList>,
) -> std::result::Result<CallToolResult, McpError> {
    match outcome {
        Ok(list) => Ok(CallToolResult::success(vec![
            Content::text(render_text(&list)),
            Content::json(&list)?,
        ])),
        Err(error) => {
            let payload = ErrorPayload::new(retailer, &error);
            Ok(CallToolResult::error(vec![Content::json(&payload)?]))
        }
    }
}

#[cfg(test)]
mod tests {
    use rmcp::model::RawContent;
    use rust_decimal::Decimal;

    use super::*;
    use crate::mcp::models::{ProductQuery, ProductRecord};

    fn record(name: &str, price: Option<Decimal>, unit: Option<&str>) -> ProductRecord {
        ProductRecord {
            name: name.to_owned(),
            price,
            retailer: Retailer::Coles,
            unit: unit.map(str::to_owned),
            size: None,
        }
    }

    fn text_of(content: &Content) -> &str {
        match &content.raw {
            RawContent::Text(text) => &text.text,
            other => panic!("expected text content, got {other:?}"),
        }
    }

    #[test]
    fn test_render_text_blocks() {
        let query = ProductQuery::new("milk", None).unwrap();
        let list = ProductList::new(Retailer::Coles, &query, vec![
            record("Coles Full Cream Milk 2L", Some(Decimal::new(31, 1)), Some("L")),
            record("Mystery Milk", None, None),
        ]);

        assert_eq!(
            render_text(&list),
            "Name: Coles Full Cream Milk 2L\nPrice: $3.10\nUnit: L\nStore: coles\n---\n\
             Name: Mystery Milk\nPrice: N/A\nUnit: N/A\nStore: coles"
        );
    }

    #[test]
    fn test_render_text_single_product_has_no_separator() {
        let query = ProductQuery::new("eggs", None).unwrap();
        let list = ProductList::new(Retailer::Woolworths, &query, vec![ProductRecord {
            retailer: Retailer::Woolworths,
            ..record("Free Range Eggs 12pk", Some(Decimal::new(650, 2)), Some("pack"))
        }]);

        let text = render_text(&list);
        assert_eq!(text, "Name: Free Range Eggs 12pk\nPrice: $6.50\nUnit: pack\nStore: woolworths");
        assert!(!text.contains(PRODUCT_SEPARATOR));
    }

    #[test]
    fn test_render_text_empty() {
        let query = ProductQuery::new("xyzzy", None).unwrap();
        let list = ProductList::new(Retailer::Coles, &query, vec![]);
        assert_eq!(render_text(&list), "No products found at Coles for 'xyzzy'.");
    }

    #[test]
    fn test_success_result() {
        let query = ProductQuery::new("milk", None).unwrap();
        let list = ProductList::new(Retailer::Coles, &query, vec![record("Milk", None, None)]);

        let result = into_call_tool_result(Retailer::Coles, Ok(list)).unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 2);
        assert!(text_of(&result.content[0]).starts_with("Name: Milk"));
        let json: serde_json::Value = serde_json::from_str(text_of(&result.content[1])).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["retailer"], "coles");
    }

    #[test]
    fn test_error_result_payload() {
        let error = BridgeError::ConfigError("COLES_API_KEY is not set".to_owned());

        let result = into_call_tool_result(Retailer::Coles, Err(error)).unwrap();

        assert_eq!(result.is_error, Some(true));
        let json: serde_json::Value = serde_json::from_str(text_of(&result.content[0])).unwrap();
        assert_eq!(json["kind"], "config_error");
        assert_eq!(json["retailer"], "coles");
        assert_eq!(json["message"], "configuration error: COLES_API_KEY is not set");
    }

    #[test]
    fn test_error_result_upstream_kind() {
        let error = BridgeError::upstream(503, b"unavailable");
        let result = into_call_tool_result(Retailer::Woolworths, Err(error)).unwrap();

        let json: serde_json::Value = serde_json::from_str(text_of(&result.content[0])).unwrap();
        assert_eq!(json["kind"], "upstream_error");
        assert_eq!(json["retailer"], "woolworths");
    }
}
