//! Batch snapshot generation
//!
//! Runs every configured (scope, party) reform over the population for every
//! configured year and collects the snapshot tables. The baseline simulation
//! is built once per call and its per-year summaries are reused by every
//! reform.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Year;
use crate::aggregate::{DECILES, PopulationImpact, PopulationSummary, decile_impacts};
use crate::catalog::{Catalog, ImpactScope, Party};
use crate::engine::SimulationEngine;
use crate::error::{BatchError, ConfigError, EngineError};
use crate::reform::Reform;
use crate::situation::{FIRST_YEAR, LAST_YEAR};
use crate::snapshot::{DecileImpactRow, ManifestoImpactRow, SnapshotSet};

/// What a batch run covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub years: Vec<Year>,
    pub parties: Vec<Party>,
    pub scopes: Vec<ImpactScope>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            years: vec![2025, 2026, 2027, 2028],
            parties: Party::ALL.to_vec(),
            scopes: ImpactScope::ALL.to_vec(),
        }
    }
}

impl BatchConfig {
    /// Parses and validates a YAML config; omitted fields take defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: BatchConfig =
            serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.is_empty() {
            return Err(ConfigError::Empty("years"));
        }
        if self.parties.is_empty() {
            return Err(ConfigError::Empty("parties"));
        }
        if self.scopes.is_empty() {
            return Err(ConfigError::Empty("scopes"));
        }
        if let Some(year) = self
            .years
            .iter()
            .find(|y| !(FIRST_YEAR..=LAST_YEAR).contains(*y))
        {
            return Err(ConfigError::YearOutOfRange(*year));
        }
        check_unique(&self.years)?;
        check_unique(&self.parties)?;
        check_unique(&self.scopes)?;
        Ok(())
    }

    /// Number of (party, year, scope) combinations
    pub fn len(&self) -> usize {
        self.years.len() * self.parties.len() * self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_unique<T: PartialEq + std::fmt::Debug>(items: &[T]) -> Result<(), ConfigError> {
    for (i, item) in items.iter().enumerate() {
        if items[..i].contains(item) {
            return Err(ConfigError::Duplicate(format!("{item:?}")));
        }
    }
    Ok(())
}

/// Progress tracking for batch runs, shareable across threads
#[derive(Debug, Clone)]
pub struct BatchProgress {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    cancelled: Arc<AtomicBool>,
}

impl BatchProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Completed (party, year, scope) combinations
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Clears the counters and any cancellation so the handle can be reused
    pub fn reset(&self, total: usize) {
        self.begin(total);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Restarts the counters, keeping a cancellation requested before the run
    fn begin(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Stops the run before its next reform simulation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Computes both snapshot tables for every combination in `config`.
///
/// Rows come back sorted (year, indirect scope first, party, decile) so the
/// output does not depend on scheduling.
pub fn run_batch<E>(
    engine: &E,
    catalog: &Catalog,
    config: &BatchConfig,
    progress: Option<&BatchProgress>,
) -> Result<SnapshotSet, BatchError>
where
    E: SimulationEngine + Sync,
    E::Sim: Sync,
{
    config.validate()?;

    let baseline = engine.population(&Reform::baseline())?;
    let baselines = config
        .years
        .iter()
        .map(|&year| PopulationSummary::compute(&baseline, year))
        .collect::<Result<Vec<_>, EngineError>>()?;

    let units: Vec<(ImpactScope, Party)> = config
        .scopes
        .iter()
        .flat_map(|&scope| config.parties.iter().map(move |&party| (scope, party)))
        .collect();

    if let Some(progress) = progress {
        progress.begin(config.len());
    }
    tracing::info!(
        years = ?config.years,
        reforms = units.len(),
        "Starting batch run"
    );

    let run_unit = |&(scope, party): &(ImpactScope, Party)| -> Result<SnapshotSet, BatchError> {
        if progress.is_some_and(BatchProgress::is_cancelled) {
            return Err(BatchError::Cancelled);
        }

        let reformed = engine.population(catalog.reform(party, scope))?;
        let mut snapshots = SnapshotSet::new();
        for (&year, base) in config.years.iter().zip(&baselines) {
            let summary = PopulationSummary::compute(&reformed, year)?;
            let impact = PopulationImpact::between(base, &summary);
            snapshots
                .manifesto
                .push(ManifestoImpactRow::new(party, year, scope, &impact));

            let deciles = decile_impacts(&baseline, &reformed, year)?;
            snapshots
                .deciles
                .extend(DECILES.zip(deciles).map(|(decile, change)| DecileImpactRow {
                    reform: party,
                    decile,
                    relative_income_change: change,
                    year,
                    includes_indirect_impacts: scope.includes_indirect(),
                }));

            if let Some(progress) = progress {
                progress.increment();
            }
            tracing::debug!(%party, %scope, year, cost = impact.cost, "Computed reform impact");
        }
        Ok(snapshots)
    };

    #[cfg(feature = "parallel")]
    let results: Vec<Result<SnapshotSet, BatchError>> = units.par_iter().map(run_unit).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<SnapshotSet, BatchError>> = units.iter().map(run_unit).collect();

    let mut snapshots = SnapshotSet::new();
    for result in results {
        snapshots.extend(result?);
    }
    snapshots.sort();

    tracing::info!(
        manifesto_rows = snapshots.manifesto.len(),
        decile_rows = snapshots.deciles.len(),
        "Batch run complete"
    );
    Ok(snapshots)
}
