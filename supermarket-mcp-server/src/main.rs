//! Supermarket MCP Server - stdio MCP server for Coles and Woolworths search
//!
//! Exposes `get_coles_products` and `get_woolworths_products` to any MCP
//! client that launches this binary over stdio.
//!
//! # Environment
//!
//! - `COLES_API_KEY`: Coles subscription key (the Coles tool reports an error
//!   result without it)
//! - `SUPERMARKET_MCP_CONFIG`: optional path to a TOML configuration file
//! - `RUST_LOG`, `LOG_FORMAT`: logging, see [`observability`]
//!
//! A `.env` file in the working directory is loaded first.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from rmcp and reqwest"
)]

mod observability;

use std::sync::Arc;

use anyhow::Context;
use rmcp::{ServiceExt, transport::stdio};
use supermarket_mcp_bridge::{
    SupermarketServer,
    config::{BridgeConfig, ConfigProvider, EnvProvider},
};
use tracing::{error, info, warn};

use crate::observability::{
    HealthCheck, HealthReport, HealthStatus, LogFormat, init_observability,
};

/// Environment variable naming the TOML configuration file.
const CONFIG_PATH_ENV: &str = "SUPERMARKET_MCP_CONFIG";

/// Loads the bridge configuration and describes where it came from.
///
/// Without [`CONFIG_PATH_ENV`] the built-in defaults are used.
fn load_config(
    env: &dyn ConfigProvider,
) -> supermarket_mcp_bridge::Result<(BridgeConfig, String)> {
    match env.get(CONFIG_PATH_ENV) {
        Some(path) => Ok((BridgeConfig::from_file(&path)?, path)),
        None => Ok((BridgeConfig::default(), "defaults".to_owned())),
    }
}

fn log_report(report: &HealthReport) {
    let json = report.to_json().unwrap_or_default();
    match report.status {
        HealthStatus::Healthy => info!(report = %json, "startup health report"),
        HealthStatus::Degraded => warn!(report = %json, "startup health report"),
        HealthStatus::Unhealthy => error!(report = %json, "startup health report"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env = EnvProvider;
    init_observability(LogFormat::from_env(&env));

    let (config, source) = match load_config(&env) {
        Ok(loaded) => loaded,
        Err(e) => {
            log_report(&HealthReport::new(vec![HealthCheck::fail("config", e.to_string())]));
            return Err(e).context("failed to load configuration");
        }
    };
    log_report(&HealthReport::startup(&config, &source, &env));

    let server = SupermarketServer::new(&config, Arc::new(env))
        .context("failed to build supermarket MCP server")?;

    info!(version = env!("CARGO_PKG_VERSION"), "serving MCP over stdio");
    let service = server.serve(stdio()).await.context("MCP initialization failed")?;
    let reason = service.waiting().await?;
    info!(?reason, "MCP session ended");

    Ok(())
}
