use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use clap::Parser;
use corkboard_core::AppConfig;
use corkboard_persistence::MemoryStore;
use corkboard_server::realtime::RoomRegistry;
use corkboard_server::{routes, AppState};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "corkboard-server",
    version,
    about = "Collaborative kanban board backend with realtime board rooms"
)]
struct Args {
    /// Address to bind, e.g. 127.0.0.1:8017
    #[arg(long, env = "CORKBOARD_BIND")]
    bind: Option<String>,

    /// Path to a TOML config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load_path(args.config);
    if let Some(bind) = args.bind {
        config.bind_addr = Some(bind);
    }

    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store, RoomRegistry::new());
    let app = routes::router(state).layer(cors);

    let addr = config.effective_bind_addr().to_string();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "corkboard server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
