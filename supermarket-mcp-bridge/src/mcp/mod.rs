//! Model Context Protocol (MCP) integration.
//!
//! This module exposes the retailer adapters to AI agents as MCP tools. It
//! handles tool registration, parameter validation and response formatting.
//!
//! # Available Tools
//!
//! - `get_coles_products`: [`tools::get_coles_products`]
//! - `get_woolworths_products`: [`tools::get_woolworths_products`]
//!
//! # Architecture
//!
//! ```text
//! AI Agent
//!     │
//!     │ MCP Protocol (JSON-RPC 2.0)
//!     ▼
//! SupermarketServer (server)
//!     │
//!     │ Parameters validation (tools)
//!     ▼
//! Retailer Adapter (retailer module)
//!     │
//!     │ ProductList or BridgeError
//!     ▼
//! CallToolResult (envelope)
//! ```

pub mod envelope;
pub mod models;
pub mod server;
pub mod tools;


pub use envelope::{ErrorPayload, into_call_tool_result, render_text};
pub use models::{ProductList, ProductQuery, ProductRecord, Retailer};
pub use server::SupermarketServer;
pub use tools::{
    GetColesProductsParams, GetWoolworthsProductsParams, get_coles_products,
    get_woolworths_products,
};
