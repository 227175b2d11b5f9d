//! Coles MCP server - main entry point
//!
//! With no subcommand the server speaks MCP over stdin/stdout until the host
//! closes stdin or the process receives Ctrl-C. The runtime is built by hand
//! so shutdown can abandon the blocked stdin reader.

use clap::{Parser, Subcommand};
use coles_mcp::config::AppConfig;
use coles_mcp::error::AppResult;
use coles_mcp::observability::{init_default_logging, metrics};
use coles_mcp::transport::{serve_stdio, shutdown_runtime};
use coles_mcp::{ColesClient, McpServer, ToolSystem};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Model Context Protocol server for the Coles product API
#[derive(Parser)]
#[command(name = "coles-mcp")]
#[command(about = "MCP server exposing Coles product search and detail lookup")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "COLES_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    Serve,
    /// Validate configuration
    Config {
        /// Print the resolved configuration (cookie redacted)
        #[arg(long)]
        show: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    init_default_logging(cli.verbose);

    info!("Starting coles-mcp v{}", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(run(cli));
    shutdown_runtime(runtime);

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }

    info!("Shutdown complete");
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match AppConfig::discover(cli.config.as_deref())? {
        (config, Some(path)) => {
            info!("Loaded configuration from: {}", path.display());
            config
        }
        (config, None) => {
            info!("No configuration file found, using built-in defaults");
            config
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Config { show } => handle_config_command(&config, show),
    }
}

/// Build the client, tools and server (all wiring lives here)
fn build_server(config: &AppConfig) -> AppResult<McpServer> {
    let client = Arc::new(ColesClient::new(&config.api)?);
    info!(base_url = %client.base_url(), "Coles API client ready");

    let tools = ToolSystem::with_coles_client(client);
    info!(tools = ?tools.list_tools(), "Tools registered");

    Ok(McpServer::new(tools, &config.server))
}

async fn run_server(config: AppConfig) -> AppResult<()> {
    let server = build_server(&config)?;

    info!("Server running on stdio");

    tokio::select! {
        result = serve_stdio(server) => result?,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    let snapshot = metrics().snapshot();
    info!(
        requests = snapshot.requests_received,
        failed = snapshot.requests_failed,
        tools = ?snapshot.tools,
        "Final metrics"
    );

    Ok(())
}

fn handle_config_command(config: &AppConfig, show: bool) -> AppResult<()> {
    // Fails on an unset cookie_env or a malformed header
    build_server(config)?;

    if show {
        println!("{}", config.redacted().to_toml()?);
    }

    info!("Configuration validation complete");
    Ok(())
}
