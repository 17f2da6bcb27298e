//! Manifesto impact comparison library
//!
//! This crate compares the fiscal and distributional impact of UK party
//! manifestos on top of an external tax-benefit microsimulation engine.
//! It supports:
//! - A catalog of per-party reforms (parameter path -> dated value schedule)
//! - Household situations built from form input
//! - A table-driven aggregator that attributes net income change to policy levers
//! - Population metrics (costs, poverty rates, Gini) and decile impacts
//! - An explicit batch step producing flat snapshots (CSV / JSON)
//!
//! # Example
//!
//! ```ignore
//! use manifesto_core::{BatchConfig, Catalog, ExportFormat, ReplayEngine, run_batch};
//!
//! let engine = ReplayEngine::from_path("recording.json")?;
//! let catalog = Catalog::load()?;
//! let snapshots = run_batch(&engine, &catalog, &BatchConfig::default(), None)?;
//! snapshots.export_dir("out/", ExportFormat::Both)?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod batch;
pub mod catalog;
pub mod display;
pub mod engine;
pub mod error;
pub mod snapshot;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod reform;
pub mod situation;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

/// Calendar year used as the calculation period throughout the crate
pub type Year = i16;

pub use aggregate::{HouseholdImpact, ImpactRow, household_impacts};
pub use batch::{BatchConfig, BatchProgress, run_batch};
pub use catalog::{Catalog, ImpactScope, Party};
pub use engine::{MicroSeries, ReplayEngine, Simulation, SimulationEngine, Variable};
pub use reform::{ParameterPath, ParameterValue, PeriodRange, Reform, ReformBuilder, Schedule};
pub use situation::{HouseholdInput, IncomeSource, Situation, Tenure};
pub use snapshot::{DecileImpactRow, ExportFormat, ManifestoImpactRow, SnapshotSet};
