//! Searches both retailers for the same term and prints the results.
//!
//! This mirrors what an agent does when asked to compare stores: two
//! independent tool calls, one per retailer.
//!
//! # Running this example
//!
//! ```bash
//! export COLES_API_KEY=<subscription key>
//! cargo run --example compare_prices -- "Cadbury chocolate"
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "examples are allowed to use println"
)]

use std::{env, sync::Arc};

use supermarket_mcp_bridge::{
    BridgeConfig,
    config::EnvProvider,
    mcp::{
        envelope::render_text,
        tools::{
            GetColesProductsParams, GetWoolworthsProductsParams, get_coles_products,
            get_woolworths_products,
        },
    },
    retailer::{ColesAdapter, WoolworthsAdapter},
    transport::ReqwestClient,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let term = env::args().nth(1).unwrap_or_else(|| "milk".to_owned());
    let config = BridgeConfig::default();
    let client = ReqwestClient::with_config(&config.http)?;

    let coles = ColesAdapter::new(client.clone(), config.coles, Arc::new(EnvProvider));
    let woolworths = WoolworthsAdapter::new(client, config.woolworths);

    let coles_params = GetColesProductsParams {
        term: Some(term.clone()),
        limit: Some(5_u32.into()),
        store_id: None,
    };
    match get_coles_products(&coles, coles_params).await {
        Ok(list) => println!("== Coles ==\n{}\n", render_text(&list)),
        Err(e) => eprintln!("== Coles ==\n{} ({})\n", e, e.kind()),
    }

    let woolworths_params = GetWoolworthsProductsParams { term: Some(term), limit: Some(5_u32.into()) };
    match get_woolworths_products(&woolworths, woolworths_params).await {
        Ok(list) => println!("== Woolworths ==\n{}", render_text(&list)),
        Err(e) => eprintln!("== Woolworths ==\n{} ({})", e, e.kind()),
    }

    Ok(())
}
