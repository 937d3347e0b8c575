use anyhow::Context;
use clap::Parser;
use gatekeeper::{
    config::{LogFormat, Settings},
    router,
    store::MemoryCredentialStore,
    AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Credential verification and session token server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML config file (default: ./gatekeeper.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);

    let store = match &settings.store.path {
        Some(path) => MemoryCredentialStore::load_json(path, settings.store.password_scheme)
            .with_context(|| format!("failed to load identities from {}", path.display()))?,
        None => MemoryCredentialStore::new(settings.store.password_scheme),
    };
    if let Some(seed) = &settings.seed {
        store.seed(seed).context("failed to seed bootstrap identity")?;
    }
    if store.is_empty() {
        info!("credential store is empty; every login will be rejected");
    }

    let bind_addr = settings.bind_addr;
    let state = match AppState::new(Arc::new(store), settings) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("cannot start without a usable signing configuration: {e}");
            return Err(e.into());
        }
    };

    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    info!("listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    match settings.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}
