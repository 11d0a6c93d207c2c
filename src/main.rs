use addressbook::{api, config, contacts::InMemoryAddressBook, logging, seed};
use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// In-memory address book served over HTTP.
#[derive(Debug, Parser)]
#[command(name = "addressbook", version, about)]
struct Cli {
    /// Address to bind (overrides SERVER_HOST).
    #[arg(long)]
    host: Option<IpAddr>,
    /// Port to bind (overrides SERVER_PORT).
    #[arg(long)]
    port: Option<u16>,
    /// Public base URL for person locators (overrides ADDRESSBOOK_BASE_URL).
    #[arg(long, value_parser = config::validate_base_url)]
    base_url: Option<String>,
    /// JSON document used to pre-populate the book (overrides ADDRESSBOOK_SEED_FILE).
    #[arg(long)]
    seed: Option<PathBuf>,
    /// File receiving a copy of the log output (overrides ADDRESSBOOK_LOG_FILE).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config(|config| {
        if let Some(host) = cli.host {
            config.server_host = host;
        }
        if cli.port.is_some() {
            config.server_port = cli.port;
        }
        if cli.base_url.is_some() {
            config.base_url = cli.base_url;
        }
        if cli.seed.is_some() {
            config.seed_file = cli.seed;
        }
        if let Some(log_file) = cli.log_file {
            config.log_file = log_file;
        }
    })
    .context("failed to load configuration")?;
    logging::init_tracing(&config.log_file);
    tracing::debug!(
        server_host = %config.server_host,
        server_port = ?config.server_port,
        base_url = ?config.base_url,
        seed_file = ?config.seed_file,
        log_file = %config.log_file.display(),
        "Loaded configuration"
    );

    let store = match &config.seed_file {
        Some(path) => seed::load_seed(path).context("failed to seed address book")?,
        None => InMemoryAddressBook::new(),
    };

    let (listener, port) = bind_listener(config)
        .await
        .context("failed to bind listener")?;
    let base_url = config.public_base_url(port);
    let app = api::create_router(Arc::new(store), &base_url);

    tracing::info!(%base_url, "Listening on http://{}:{}", config.server_host, port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn bind_listener(config: &config::Config) -> Result<(TcpListener, u16), std::io::Error> {
    let host = config.server_host;
    if let Some(port) = config.server_port {
        let listener = TcpListener::bind((host, port)).await?;
        let port = listener.local_addr()?.port();
        return Ok((listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8282..=8299;
    for port in PORT_RANGE {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8282-8299",
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
