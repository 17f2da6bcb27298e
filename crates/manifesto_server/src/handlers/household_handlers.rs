use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use manifesto_core::{HouseholdInput, ImpactRow, household_impacts};

use crate::error::ApiResult;
use crate::state::AppState;
use crate::validation;

// ============================================================================
// Household Handlers
// ============================================================================

/// Every party's impact on one household, flattened to `[{metric, value, party}]`
/// in party order with values rounded to pence
pub async fn calculate_household(
    State(state): State<AppState>,
    payload: Result<Json<HouseholdInput>, JsonRejection>,
) -> ApiResult<Json<Vec<ImpactRow>>> {
    let Json(input) = payload?;
    validation::validate_household(&input)?;

    tracing::info!(year = input.year, include_indirect = input.include_indirect, "Household request");

    let impacts = tokio::task::spawn_blocking(move || {
        household_impacts(state.engine.as_ref(), &state.catalog, &input)
    })
    .await??;

    let rows = impacts
        .into_iter()
        .flat_map(|impact| impact.rows)
        .map(|row| ImpactRow {
            value: validation::round_to_pence(row.value),
            ..row
        })
        .collect();

    Ok(Json(rows))
}
