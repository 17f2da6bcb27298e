use axum::{Router, routing::post};

use crate::handlers;
use crate::state::AppState;

pub fn household_routes() -> Router<AppState> {
    Router::new().route("/household", post(handlers::calculate_household))
}
