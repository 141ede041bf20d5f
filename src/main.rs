//! MCP Server Entry Point
//!
//! Loads `.env`, initializes logging, reads the configuration and serves the
//! Prometheus tools on the configured transport.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use prometheus_mcp_server::core::{Config, LoggingConfig, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    // Logging first, so configuration problems are reported
    init_logging(&LoggingConfig::from_env());

    let config = Config::from_env()?;
    info!("Starting {} v{}", config.server.name, config.server.version);
    info!("Prometheus endpoint: {}", config.prometheus.url);

    let server = McpServer::new(config.clone())?;
    info!("Server initialized");

    TransportService::new(config.transport).run(server).await?;

    info!("Server shutting down");
    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::from_default_env().add_directive(logging.level().into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
