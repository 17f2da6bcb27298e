use axum::{Router, routing::get};
use manifesto_core::{Catalog, ReplayEngine, SnapshotSet};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod error;
mod handlers;
mod routes;
mod state;
mod validation;

#[cfg(test)]
mod tests;

use state::{AppState, ServerConfig};

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Manifesto API Server" }))
        .merge(routes::household_routes())
        .merge(routes::snapshot_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn load_state(config: &ServerConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let engine = match &config.recording {
        Some(path) => ReplayEngine::from_path(path)?,
        None => {
            tracing::warn!("MANIFESTO_RECORDING not set; household requests will fail");
            ReplayEngine::new()
        }
    };
    let snapshots = match &config.snapshots {
        Some(dir) => Some(SnapshotSet::load_dir(dir)?),
        None => {
            tracing::warn!("MANIFESTO_SNAPSHOTS not set; snapshot endpoints are unavailable");
            None
        }
    };
    Ok(AppState::new(engine, Catalog::load()?, snapshots))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("manifesto_server=info,manifesto_core=info,tower_http=info")
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let state = load_state(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
