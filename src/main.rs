use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use spc_lib::{server, Config};

/// Style parity checker service.
///
/// Serves an HTTP API that captures a web page, extracts design data from a
/// Figma document, and reports per-element style differences.
#[derive(Debug, Parser)]
#[command(name = "spc", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "spc_lib=debug,tower_http=debug"
    } else {
        "spc_lib=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let figma_token = std::env::var("FIGMA_ACCESS_TOKEN").ok();
    if figma_token.is_none() {
        warn!("FIGMA_ACCESS_TOKEN is not set; design extraction will be unavailable");
    }

    if let Err(e) = server::serve(config, figma_token).await {
        error!(error = %e, "server terminated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
