//! Supermarket MCP Bridge: Coles and Woolworths product search for AI agents
//!
//! A Rust library that exposes Australian supermarket product search as
//! Model Context Protocol (MCP) tools. An agent asks for a product by name and
//! gets back normalized names, shelf prices and units from Coles or
//! Woolworths.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   AI Agent      │  any MCP-compatible client
//! └────────┬────────┘
//!          │ MCP Protocol (JSON-RPC 2.0 over stdio)
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │        Supermarket MCP Bridge (this crate)      │
//! │  ┌──────────────┐      ┌──────────────────┐     │
//! │  │  MCP Tools   │──────│ Retailer Adapters│     │
//! │  │  (mcp)       │      │ (retailer)       │     │
//! │  └──────────────┘      └────────┬─────────┘     │
//! │                        ┌────────▼─────────┐     │
//! │                        │   HttpClient     │     │
//! │                        │   (transport)    │     │
//! │                        └──────────────────┘     │
//! └────────┬───────────────────────────────────────┘
//!          │ HTTPS
//!          │
//! ┌────────▼────────┐
//! │ Coles API /     │
//! │ Woolworths web  │
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use supermarket_mcp_bridge::{
//!     config::WoolworthsConfig,
//!     mcp::tools::{GetWoolworthsProductsParams, get_woolworths_products},
//!     retailer::WoolworthsAdapter,
//!     transport::ReqwestClient,
//! };
//!
//! # async fn example() -> supermarket_mcp_bridge::Result<()> {
//! let adapter = WoolworthsAdapter::new(ReqwestClient::new()?, WoolworthsConfig::default());
//!
//! let params = GetWoolworthsProductsParams {
//!     term: Some("Cadbury chocolate".into()),
//!     limit: Some(5_u32.into()),
//! };
//! let list = get_woolworths_products(&adapter, params).await?;
//!
//! for product in &list.products {
//!     println!("{}: {:?}", product.name, product.price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`mcp`]: tool parameters, result envelope and the `rmcp` server
//! - [`retailer`]: Coles and Woolworths adapters
//! - [`transport`]: HTTP client seam and its reqwest implementation
//! - [`config`]: TOML configuration and credential lookup
//! - [`error`]: error taxonomy reported to agents
//!
//! # Credentials
//!
//! The Coles tool reads its subscription key from `COLES_API_KEY` on every
//! call. A missing key is reported to the agent as a `config_error` result;
//! the server still starts and the Woolworths tool keeps working.
//!
//! # Error Handling
//!
//! All operations return [`Result<T, BridgeError>`](error::Result). At the
//! tool boundary errors become MCP error results rather than protocol errors:
//!
//! ```rust
//! use supermarket_mcp_bridge::{BridgeError, error::ErrorKind};
//!
//! let err = BridgeError::upstream(429, b"Too Many Requests");
//! assert_eq!(err.kind(), ErrorKind::Upstream);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from rmcp and reqwest"
)]

pub mod config;
pub mod error;
pub mod mcp;
pub mod retailer;
pub mod transport;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use mcp::server::SupermarketServer;
