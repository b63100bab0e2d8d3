//! `rmcp` server exposing the product search tools.

use std::{fmt, sync::Arc};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::{
    config::{BridgeConfig, ConfigProvider},
    mcp::{
        envelope::into_call_tool_result,
        models::Retailer,
        tools::{self, GetColesProductsParams, GetWoolworthsProductsParams},
    },
    retailer::{ColesAdapter, WoolworthsAdapter},
    transport::ReqwestClient,
};

const INSTRUCTIONS: &str = "Australian supermarket product search. Use get_coles_products and \
                            get_woolworths_products to look up current shelf prices. To compare \
                            both stores, call each tool once with the same term.";

/// MCP server with one tool per retailer.
///
/// Both adapters share one connection pool. Cloning the server is cheap.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use rmcp::{ServiceExt, transport::stdio};
/// use supermarket_mcp_bridge::{
///     config::{BridgeConfig, EnvProvider},
///     mcp::server::SupermarketServer,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = SupermarketServer::new(&BridgeConfig::default(), Arc::new(EnvProvider))?;
/// server.serve(stdio()).await?.waiting().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SupermarketServer {
    coles: Arc<ColesAdapter<ReqwestClient>>,
    woolworths: Arc<WoolworthsAdapter<ReqwestClient>>,
    tool_router: ToolRouter<Self>,
}

impl fmt::Debug for SupermarketServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupermarketServer")
            .field("coles", &self.coles)
            .field("woolworths", &self.woolworths)
            .finish_non_exhaustive()
    }
}

#[tool_router]
impl SupermarketServer {
    /// Builds the server from configuration.
    ///
    /// The configuration is not validated here; callers loading untrusted
    /// files should call [`BridgeConfig::validate`] first.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &BridgeConfig, secrets: Arc<dyn ConfigProvider>) -> crate::Result<Self> {
        let client = ReqwestClient::with_config(&config.http)?;
        Ok(Self {
            coles: Arc::new(ColesAdapter::new(client.clone(), config.coles.clone(), secrets)),
            woolworths: Arc::new(WoolworthsAdapter::new(client, config.woolworths.clone())),
            tool_router: Self::tool_router(),
        })
    }

    /// `get_coles_products` tool.
    ///
    /// # Errors
    ///
    /// Returns [`McpError`] only if the result cannot be serialized; search
    /// failures are reported inside the [`CallToolResult`].
    #[tool(
        description = "Search Coles products by name. Returns product names, current prices and \
                       units. Optionally restrict to a store with store_id. Requires the \
                       COLES_API_KEY environment variable."
    )]
    pub async fn get_coles_products(
        &self,
        Parameters(params): Parameters<GetColesProductsParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = tools::get_coles_products(self.coles.as_ref(), params).await;
        into_call_tool_result(Retailer::Coles, outcome)
    }

    /// `get_woolworths_products` tool.
    ///
    /// # Errors
    ///
    /// Returns [`McpError`] only if the result cannot be serialized; search
    /// failures are reported inside the [`CallToolResult`].
    #[tool(
        description = "Search Woolworths products by name. Returns product names, current prices \
                       and units."
    )]
    pub async fn get_woolworths_products(
        &self,
        Parameters(params): Parameters<GetWoolworthsProductsParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = tools::get_woolworths_products(self.woolworths.as_ref(), params).await;
        into_call_tool_result(Retailer::Woolworths, outcome)
    }
}

#[tool_handler]
impl ServerHandler for SupermarketServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::default()
            },
            ..Default::default()
        }
    }
}
