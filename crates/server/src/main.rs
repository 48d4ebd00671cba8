use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Employee record REST service", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "roster.toml")]
    config: PathBuf,

    /// Data directory for storage
    #[arg(short, long, env = "ROSTER_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Database file, overrides the configured location
    #[arg(long, env = "ROSTER_DATABASE")]
    database: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "ROSTER_PORT", default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "ROSTER_HOST", default_value = "127.0.0.1")]
    host: String,
}

impl Args {
    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log to stdout; `RUST_LOG` overrides the default filter
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster=info,roster_core=info,tower_http=debug".into()),
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let addr = args.bind_addr();

    let config = ServerConfig::load(&args.config, args.data_dir, args.database)?;
    tracing::info!(
        config = %args.config.display(),
        database = %config.database_path().display(),
        "Roster employee service configured"
    );

    api::serve(&addr, config).await
}
