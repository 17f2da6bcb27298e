use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use manifesto_core::{DecileImpactRow, ManifestoImpactRow, SnapshotSet, Year};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation;

/// Optional filters; omitted filters match every row
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactQuery {
    pub year: Option<Year>,
    pub include_indirect: Option<bool>,
}

impl ImpactQuery {
    fn matches(&self, year: Year, includes_indirect: bool) -> bool {
        self.year.is_none_or(|y| y == year)
            && self.include_indirect.is_none_or(|i| i == includes_indirect)
    }
}

fn snapshots(state: &AppState, query: &ImpactQuery) -> ApiResult<Arc<SnapshotSet>> {
    validation::validate_year(query.year)?;
    state.snapshots.clone().ok_or(ApiError::SnapshotsUnavailable)
}

// ============================================================================
// Snapshot Handlers
// ============================================================================

pub async fn list_manifesto_impacts(
    State(state): State<AppState>,
    Query(query): Query<ImpactQuery>,
) -> ApiResult<Json<Vec<ManifestoImpactRow>>> {
    let snapshots = snapshots(&state, &query)?;
    let rows = snapshots
        .manifesto
        .iter()
        .filter(|r| query.matches(r.year, r.includes_indirect_impacts))
        .cloned()
        .collect();
    Ok(Json(rows))
}

pub async fn list_decile_impacts(
    State(state): State<AppState>,
    Query(query): Query<ImpactQuery>,
) -> ApiResult<Json<Vec<DecileImpactRow>>> {
    let snapshots = snapshots(&state, &query)?;
    let rows = snapshots
        .deciles
        .iter()
        .filter(|r| query.matches(r.year, r.includes_indirect_impacts))
        .cloned()
        .collect();
    Ok(Json(rows))
}
