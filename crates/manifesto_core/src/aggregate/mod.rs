//! Impact aggregation
//!
//! Differences reform simulations against the baseline:
//! - `household` attributes one household's net income change to policy levers
//! - `population` reduces whole-population simulations to fiscal, poverty and
//!   inequality metrics
//! - `decile` splits the relative net income change by baseline income decile

mod decile;
mod household;
mod population;

pub use decile::{DECILES, decile_impacts};
pub use household::{
    HOUSEHOLD_METRICS, HouseholdImpact, ImpactRow, MetricDefinition, MetricKind, attribute,
    household_impacts,
};
pub use population::{PopulationImpact, PopulationSummary};

/// `(reform - baseline) / baseline` as a percentage; zero when the
/// baseline is zero
pub fn relative_change(baseline: f64, reform: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        (reform - baseline) / baseline * 100.0
    }
}
