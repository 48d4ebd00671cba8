// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use roster_mcp::server::McpServer;
use roster_mcp::tools::employee_registry;
use roster_sdk::RosterClient;

#[derive(Parser, Debug)]
#[command(name = "roster-mcp")]
#[command(about = "JSON-RPC tool server in front of the Roster REST API", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "ROSTER_MCP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "ROSTER_MCP_PORT", default_value = "8001")]
    port: u16,

    /// Base URL of the employee REST API
    #[arg(long, env = "REST_API_BASE_URL", default_value = "http://127.0.0.1:8000")]
    rest_api_base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_mcp=info,tower_http=debug".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Roster MCP server starting...");

    let client = RosterClient::builder()
        .base_url(&args.rest_api_base_url)
        .build()
        .with_context(|| format!("Invalid REST API URL: {}", args.rest_api_base_url))?;

    let registry = employee_registry(client);
    tracing::info!(
        "Registered {} tools forwarding to {}",
        registry.len(),
        args.rest_api_base_url
    );

    let addr = format!("{}:{}", args.host, args.port);
    McpServer::new(registry).start(&addr).await?;

    Ok(())
}
