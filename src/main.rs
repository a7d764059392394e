//! Portal server.
//!
//! Serves the single-page application and proxies the social network APIs it
//! talks to, so the browser never hits CORS or upstream fingerprinting.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!     Client Request      │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!     ────────────────────┼─▶│  http  │──▶│ routing │──▶│  upstream  │───┼──▶ reddit, mastodon,
//!                         │  │ server │   │ decide  │   │  fetcher   │   │    lemmy, bluesky, ...
//!                         │  └────────┘   └────┬────┘   └─────┬──────┘   │
//!                         │                    │              ▼          │
//!                         │                    ▼        ┌────────────┐   │
//!     Client Response     │              ┌──────────┐   │   relay    │   │
//!     ◀───────────────────┼──────────────│  assets  │   │ + CORS     │   │
//!                         │              │ SPA/dist │   └────────────┘   │
//!                         │              └──────────┘                    │
//!                         └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::net::TcpListener;

use portal_server::config::{loader, PortalConfig};
use portal_server::lifecycle::{startup, Shutdown};
use portal_server::observability::logging;
use portal_server::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "portal-server")]
#[command(about = "Serve the portal SPA and proxy its social network APIs", long_about = None)]
struct Cli {
    /// Port to listen on (all interfaces).
    #[arg(short, long, env = "PORTAL_PORT")]
    port: Option<u16>,

    /// Full bind address, e.g. 127.0.0.1:8090. Overrides the config file.
    #[arg(long, env = "PORTAL_BIND")]
    bind: Option<String>,

    /// Directory holding the built SPA (defaults to a discovered dist/).
    #[arg(short, long, env = "PORTAL_DIST_DIR")]
    dist: Option<PathBuf>,

    /// Optional TOML file overriding the built-in configuration.
    #[arg(short, long, env = "PORTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, env = "PORTAL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Verify upstream TLS certificates and hostnames.
    #[arg(long)]
    strict_tls: bool,
}

impl Cli {
    fn apply(self, mut config: PortalConfig) -> PortalConfig {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.listener.set_port(port);
        }
        if let Some(dist) = self.dist {
            config.assets.root = Some(dist);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if self.strict_tls {
            config.upstream.insecure_skip_verify = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match loader::read_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => PortalConfig::default(),
    };

    let config = match loader::finalize(cli.apply(config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: PortalConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        timeout_secs = config.upstream.timeout_secs,
        insecure_skip_verify = config.upstream.insecure_skip_verify,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config)?;

    startup::announce(listener.local_addr()?, server.state().assets.root());

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
