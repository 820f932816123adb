//! MCP bridge exposing the forms abilities as tools over stdio.
//!
//! # Environment Variables
//!
//! - `WP_BASE_URL`: root URL of the forms service (required)
//! - `WP_USERNAME`, `WP_APP_PASSWORD`: sent as basic auth when both are set
//! - `RUST_LOG`: tracing filter (default: "info"); logs go to stderr

use forms_abilities::bridge::Bridge;
use forms_abilities::config::BridgeConfig;
use forms_abilities::mcp::McpServer;
use mimalloc::MiMalloc;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    let config = BridgeConfig::from_env()?;
    info!(
        base_url = %config.base_url,
        authenticated = config.username.is_some() && config.app_password.is_some()
    );

    let bridge = Bridge::new(&config)?;
    let service = McpServer::new(bridge).serve(stdio()).await?;
    info!("MCP bridge ready on stdio");
    let reason = service.waiting().await?;
    info!(?reason, "MCP bridge stopped");
    Ok(())
}
