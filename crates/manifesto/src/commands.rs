use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{WrapErr, bail, eyre};
use manifesto_core::display::{SocietalMetric, best_household_party, format_gbp, format_pct, largest_impact};
use manifesto_core::{
    BatchConfig, BatchProgress, Catalog, ExportFormat, HouseholdImpact, HouseholdInput,
    ImpactScope, Party, ReplayEngine, SnapshotSet, Year, household_impacts, run_batch,
};

/// How often batch progress is logged
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

const LABEL_WIDTH: usize = 26;
const COLUMN_WIDTH: usize = 20;

fn load_engine(recording: &Path) -> color_eyre::Result<ReplayEngine> {
    ReplayEngine::from_path(recording)
        .wrap_err_with(|| format!("failed to load recording {}", recording.display()))
}

fn print_header(parties: impl Iterator<Item = Party>) {
    let mut line = format!("{:<LABEL_WIDTH$}", "");
    for party in parties {
        line.push_str(&format!("{:>COLUMN_WIDTH$}", party.name()));
    }
    println!("{line}");
}

fn print_row(label: &str, cells: impl Iterator<Item = String>) {
    let mut line = format!("{label:<LABEL_WIDTH$}");
    for cell in cells {
        line.push_str(&format!("{cell:>COLUMN_WIDTH$}"));
    }
    println!("{line}");
}

// ============================================================================
// batch
// ============================================================================

pub fn batch(
    recording: &Path,
    config: Option<&Path>,
    out: &Path,
    format: ExportFormat,
) -> color_eyre::Result<()> {
    let engine = load_engine(recording)?;
    let catalog = Catalog::load()?;
    let config = match config {
        Some(path) => BatchConfig::from_path(path)?,
        None => BatchConfig::default(),
    };

    let progress = BatchProgress::new(config.len());
    let snapshots = thread::scope(|scope| {
        let worker = scope.spawn(|| run_batch(&engine, &catalog, &config, Some(&progress)));
        let mut reported = 0;
        while !worker.is_finished() {
            thread::sleep(PROGRESS_INTERVAL);
            let completed = progress.completed();
            if completed != reported {
                tracing::info!(completed, total = progress.total(), "Batch progress");
                reported = completed;
            }
        }
        worker.join()
    })
    .map_err(|_| eyre!("batch worker panicked"))??;

    snapshots.check_complete(&config)?;
    for path in snapshots.export_dir(out, format)? {
        println!("{}", path.display());
    }
    Ok(())
}

// ============================================================================
// household
// ============================================================================

pub fn household(
    recording: &Path,
    input: &Path,
    direct_only: bool,
    json: bool,
) -> color_eyre::Result<()> {
    let content = fs::read_to_string(input)
        .wrap_err_with(|| format!("failed to read {}", input.display()))?;
    let mut input: HouseholdInput = serde_json::from_str(&content).wrap_err("invalid household input")?;
    if direct_only {
        input.include_indirect = false;
    }

    let engine = load_engine(recording)?;
    let catalog = Catalog::load()?;
    let impacts = household_impacts(&engine, &catalog, &input)?;

    if json {
        let rows: Vec<_> = impacts.iter().flat_map(|impact| &impact.rows).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print_household_table(&impacts, input.year, input.scope());
    Ok(())
}

fn print_household_table(impacts: &[HouseholdImpact], year: Year, scope: ImpactScope) {
    println!("Change in household net income, {year} ({scope})");
    print_header(impacts.iter().map(|impact| impact.party));

    let Some(first) = impacts.first() else {
        return;
    };
    for row in &first.rows {
        let cells = impacts
            .iter()
            .map(|impact| impact.value(&row.metric).map_or_else(String::new, format_gbp));
        print_row(&row.metric, cells);
    }

    if let Some(party) = best_household_party(impacts, "Net change") {
        println!();
        println!("The {party} would increase your net income the most");
    }
}

// ============================================================================
// show
// ============================================================================

pub fn show(dir: &Path, year: Year, direct_only: bool) -> color_eyre::Result<()> {
    let scope = ImpactScope::from_include_indirect(!direct_only);
    let snapshots = SnapshotSet::load_dir(dir)
        .wrap_err_with(|| format!("failed to load snapshots from {}", dir.display()))?
        .filter(year, scope);
    if snapshots.manifesto.is_empty() {
        bail!("no snapshot rows for {year} ({scope}) in {}", dir.display());
    }

    println!("Population impacts, {year} ({scope})");
    print_header(snapshots.manifesto.iter().map(|row| row.manifesto));
    for metric in SocietalMetric::ALL {
        let cells = snapshots.manifesto.iter().map(|row| metric.format(metric.value(row)));
        print_row(metric.label(), cells);
    }

    println!();
    for metric in SocietalMetric::ALL {
        if let Some(headline) = largest_impact(metric, &snapshots.manifesto) {
            println!("{}: {}", metric.label(), headline.text);
        }
    }

    println!();
    println!("Relative net income change by decile");
    print_header(snapshots.manifesto.iter().map(|row| row.manifesto));
    for decile in manifesto_core::aggregate::DECILES {
        let cells = snapshots.manifesto.iter().map(|row| {
            snapshots
                .deciles
                .iter()
                .find(|d| d.reform == row.manifesto && d.decile == decile)
                .map_or_else(String::new, |d| format_pct(d.relative_income_change))
        });
        print_row(&decile.to_string(), cells);
    }
    Ok(())
}
