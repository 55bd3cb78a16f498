use anyhow::Context;
use clap::{Parser, ValueEnum};
use ersatz_server::config::{load_routes, ServerConfig};
use ersatz_server::{metrics, MockServer, RouteStore};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ROUTES_FILE: &str = "configs.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Rule-driven HTTP mock server
#[derive(Parser, Debug)]
#[command(name = "ersatz", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "ERSATZ_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "ERSATZ_PORT")]
    port: Option<u16>,

    /// Routes file (.json, .yaml or .yml)
    #[arg(short, long, env = "ERSATZ_ROUTES")]
    routes: Option<PathBuf>,

    /// Server config file (YAML)
    #[arg(short, long, env = "ERSATZ_CONFIG")]
    config: Option<PathBuf>,

    /// Port for the Prometheus metrics listener
    #[arg(long, env = "ERSATZ_METRICS_PORT")]
    metrics_port: Option<u16>,

    /// Disable the metrics listener
    #[arg(long)]
    no_metrics: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Args {
    /// Load the config file, if any, and apply command-line overrides.
    fn resolve_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = &self.host {
            config.listen.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listen.port = port;
        }
        if let Some(routes) = &self.routes {
            config.routes = Some(routes.clone());
        }
        if let Some(port) = self.metrics_port {
            config.metrics.port = port;
        }
        if self.no_metrics {
            config.metrics.enabled = false;
        }
        Ok(config)
    }
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let config = args.resolve_config()?;

    let routes_path = config
        .routes
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROUTES_FILE));
    let routes = match load_routes(&routes_path) {
        Ok(routes) => routes,
        Err(e) if e.is_not_found() => {
            warn!("No routes loaded: {}", e);
            Vec::new()
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to load routes {}", routes_path.display()));
        }
    };

    let host: IpAddr = config
        .listen
        .host
        .parse()
        .with_context(|| format!("Invalid listen host {:?}", config.listen.host))?;

    if config.metrics.enabled {
        let metrics_addr = SocketAddr::new(host, config.metrics.port);
        tokio::spawn(async move {
            if let Err(e) = metrics::serve_metrics(metrics_addr).await {
                error!("Metrics server error: {}", e);
            }
        });
    }

    let store = Arc::new(RouteStore::new(routes));
    let server = MockServer::bind(SocketAddr::new(host, config.listen.port), store)
        .await
        .context("Failed to start mock server")?;
    info!("Serving mock routes on http://{}", server.local_addr());

    server.run_until(shutdown_signal()).await;
    Ok(())
}
