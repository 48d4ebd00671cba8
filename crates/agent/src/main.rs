use anyhow::{bail, Result};
use clap::Parser;
use roster_agent::{Agent, GeminiConfigBuilder, GeminiModel, McpClient};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "roster-agent")]
#[command(about = "Chat with a hosted model that can manage employee records", long_about = None)]
struct Args {
    /// Google Cloud project id
    #[arg(long, env = "GOOGLE_PROJECT_ID")]
    project: Option<String>,

    /// Vertex AI location, e.g. us-central1 or global
    #[arg(long, env = "GOOGLE_CLOUD_LOCATION")]
    location: Option<String>,

    /// Gemini model name
    #[arg(long, env = "MODEL_NAME", default_value = "gemini-2.0-flash")]
    model: String,

    /// OAuth access token for Vertex AI
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// JSON-RPC endpoint of the tool server
    #[arg(long, env = "MCP_SERVER_URL", default_value = "http://127.0.0.1:8001/mcp/")]
    mcp_server_url: String,

    /// Override the Vertex AI base URL
    #[arg(long, env = "MODEL_ENDPOINT")]
    model_endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the chat
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_agent=warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let (Some(project), Some(location)) = (args.project, args.location) else {
        bail!("Missing GOOGLE_PROJECT_ID or GOOGLE_CLOUD_LOCATION");
    };
    let Some(access_token) = args.access_token else {
        bail!("Missing GOOGLE_ACCESS_TOKEN");
    };

    let mut config = GeminiConfigBuilder::new(project, location, access_token).with_model(args.model);
    if let Some(endpoint) = args.model_endpoint {
        config = config.with_base_url(endpoint);
    }
    let config = config.build();
    tracing::info!(model = config.model(), endpoint = %config.endpoint(), "Using Gemini");

    let mcp = McpClient::new(args.mcp_server_url);
    match mcp.list_tools().await {
        Ok(tools) => tracing::info!(count = tools.len(), "Tool server is reachable"),
        Err(e) => tracing::warn!("Could not list tools at {}: {}", mcp.endpoint(), e),
    }

    let mut agent = Agent::new(GeminiModel::new(config), mcp);
    chat(&mut agent).await
}

async fn chat(agent: &mut Agent) -> Result<()> {
    println!("Employee assistant ready. Type 'exit' or 'quit' to end.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n[USER] > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match agent.run_turn(input).await {
            Ok(answer) => println!("\n[AGENT] {}", answer),
            Err(e) => {
                eprintln!("\n[ERROR] {}", e);
                break;
            }
        }
    }

    Ok(())
}
