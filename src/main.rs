use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pieces_gateway::backend::grpc::GrpcBackend;
use pieces_gateway::{api, config, AppState};

/// OpenAI-compatible gateway for the Pieces OS inference services.
#[derive(Parser)]
#[command(name = "pieces-gateway", version, about)]
struct Cli {
    /// Port to bind (overrides PORT from the environment)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "pieces_gateway=debug,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut cfg = config::load()?;
    let cli = Cli::parse();
    if let Some(port) = cli.port {
        cfg.port = port;
    }
    let port = cfg.port;

    if cfg.api_key.is_none() {
        tracing::warn!("API_KEY is not set — the gateway accepts unauthenticated requests");
    }
    tracing::info!(
        gpt = %cfg.gpt_grpc,
        vertex = %cfg.common_grpc,
        max_retries = cfg.retry.max_attempts,
        "configured backends",
    );

    let backend = GrpcBackend::connect(&cfg)?;
    let state = Arc::new(AppState::new(cfg, Arc::new(backend)));
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("pieces-gateway listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
