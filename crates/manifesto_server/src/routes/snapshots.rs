use axum::{Router, routing::get};

use crate::handlers;
use crate::state::AppState;

pub fn snapshot_routes() -> Router<AppState> {
    Router::new()
        .route("/api/manifesto-impacts", get(handlers::list_manifesto_impacts))
        .route("/api/decile-impacts", get(handlers::list_decile_impacts))
}
