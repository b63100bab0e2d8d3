//! Tool-level tests through [`SupermarketServer`].

use std::sync::Arc;

use httpmock::prelude::*;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, RawContent},
};
use serde_json::json;
use supermarket_mcp_bridge::{
    SupermarketServer,
    config::{BridgeConfig, ColesConfig, StaticProvider, WoolworthsConfig},
    mcp::tools::{GetColesProductsParams, GetWoolworthsProductsParams},
    retailer::{coles, woolworths},
};

fn server_for(mock: &MockServer, secrets: StaticProvider) -> SupermarketServer {
    let config = BridgeConfig {
        coles: ColesConfig { base_url: mock.base_url(), ..ColesConfig::default() },
        woolworths: WoolworthsConfig { base_url: mock.base_url(), ..WoolworthsConfig::default() },
        ..BridgeConfig::default()
    };
    SupermarketServer::new(&config, Arc::new(secrets)).unwrap()
}

fn texts(result: &CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .map(|content| match &content.raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {other:?}"),
        })
        .collect()
}

#[tokio::test]
async fn test_coles_tool_success() {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path(coles::SEARCH_PATH).header("Ocp-Apim-Subscription-Key", "k");
        then.status(200).json_body(json!({
            "results": [
                { "_type": "SINGLE_TILE", "adId": "banner" },
                { "_type": "PRODUCT", "name": "Full Cream Milk", "brand": "Coles", "size": "2L",
                  "pricing": { "now": 3.1 } }
            ]
        }));
    })
    .await;

    let server = server_for(&mock, StaticProvider::new().with("COLES_API_KEY", "k"));
    let result = server
        .get_coles_products(Parameters(GetColesProductsParams {
            term: Some("milk".to_owned()),
            limit: Some(5_u32.into()),
            store_id: None,
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(false));
    let texts = texts(&result);
    assert_eq!(texts[0], "Name: Coles Full Cream Milk\nPrice: $3.10\nUnit: L\nStore: coles");
    let payload: serde_json::Value = serde_json::from_str(&texts[1]).unwrap();
    assert_eq!(payload["retailer"], "coles");
    assert_eq!(payload["query"], "milk");
    assert_eq!(payload["count"], 1);
    assert_eq!(payload["products"][0]["price"], "3.1");
}

#[tokio::test]
async fn test_coles_tool_missing_key() {
    let mock = MockServer::start_async().await;
    let search = mock
        .mock_async(|when, then| {
            when.path_contains("/");
            then.status(200).json_body(json!({ "results": [] }));
        })
        .await;

    let server = server_for(&mock, StaticProvider::new());
    let result = server
        .get_coles_products(Parameters(GetColesProductsParams {
            term: Some("milk".to_owned()),
            limit: None,
            store_id: Some("123".to_owned()),
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let payload: serde_json::Value = serde_json::from_str(&texts(&result)[0]).unwrap();
    assert_eq!(payload["kind"], "config_error");
    assert_eq!(payload["retailer"], "coles");
    assert!(payload["message"].as_str().unwrap().contains("COLES_API_KEY"));
    assert_eq!(search.hits_async().await, 0);
}

#[tokio::test]
async fn test_woolworths_tool_empty_result() {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path(woolworths::SEARCH_PATH);
        then.status(200).json_body(json!({ "Products": null }));
    })
    .await;

    let server = server_for(&mock, StaticProvider::new());
    let result = server
        .get_woolworths_products(Parameters(GetWoolworthsProductsParams {
            term: Some("xyzzy".to_owned()),
            limit: None,
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(false));
    assert_eq!(texts(&result)[0], "No products found at Woolworths for 'xyzzy'.");
}

#[tokio::test]
async fn test_woolworths_failure_does_not_affect_coles() {
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path(woolworths::SEARCH_PATH);
        then.status(500).body("boom");
    })
    .await;
    mock.mock_async(|when, then| {
        when.method(GET).path(coles::SEARCH_PATH);
        then.status(200)
            .json_body(json!({ "results": [{ "name": "Eggs", "pricing": { "now": 5 } }] }));
    })
    .await;

    let server = server_for(&mock, StaticProvider::new().with("COLES_API_KEY", "k"));

    let woolworths = server
        .get_woolworths_products(Parameters(GetWoolworthsProductsParams {
            term: Some("eggs".to_owned()),
            limit: None,
        }))
        .await
        .unwrap();
    let coles = server
        .get_coles_products(Parameters(GetColesProductsParams {
            term: Some("eggs".to_owned()),
            limit: None,
            store_id: None,
        }))
        .await
        .unwrap();

    assert_eq!(woolworths.is_error, Some(true));
    let payload: serde_json::Value = serde_json::from_str(&texts(&woolworths)[0]).unwrap();
    assert_eq!(payload["kind"], "upstream_error");
    assert_eq!(coles.is_error, Some(false));
}

#[tokio::test]
async fn test_woolworths_limit_above_one_hundred() {
    let products: Vec<_> = (0..120)
        .map(|i| json!({ "Stockcode": i, "DisplayName": format!("Bread {i}"), "Price": 3.5 }))
        .collect();
    let mock = MockServer::start_async().await;
    mock.mock_async(|when, then| {
        when.method(GET).path(woolworths::SEARCH_PATH);
        then.status(200).json_body(json!({ "Products": products }));
    })
    .await;

    let server = server_for(&mock, StaticProvider::new());
    let result = server
        .get_woolworths_products(Parameters(GetWoolworthsProductsParams {
            term: Some("bread".to_owned()),
            limit: Some(150_u32.into()),
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(false));
    let payload: serde_json::Value = serde_json::from_str(&texts(&result)[1]).unwrap();
    assert_eq!(payload["count"], 120);
}
