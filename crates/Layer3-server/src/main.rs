//! Digest service - Main entry point

use anyhow::Context;
use clap::Parser;
use digest_foundation::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Control service for the multi-agent digest pipeline
#[derive(Parser, Debug)]
#[command(name = "digest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Compose project directory holding `data/input` and `output`
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// JSON config file (defaults to `<base-dir>/digest.json` when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Browser origin allowed to call the API
    #[arg(long)]
    cors_origin: Option<String>,

    /// Serialize overlapping run requests
    #[arg(long)]
    serialize_runs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_config(args: &Args) -> anyhow::Result<ServiceConfig> {
    let base_dir = match &args.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let mut config = ServiceConfig::load(base_dir, args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config = config.with_bind(bind);
    }
    if let Some(origin) = &args.cors_origin {
        config = config.with_cors_origin(origin.clone());
    }
    if args.serialize_runs {
        config = config.with_serialize_runs(true);
    }
    Ok(config)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(&args)?;
    let bind = config.bind;
    info!(
        base_dir = %config.base_dir.display(),
        agents = config.agents.len(),
        serialize_runs = config.serialize_runs,
        "Loaded configuration"
    );

    let app = digest_server::app(config)?;

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    info!(addr = %bind, "Digest API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
