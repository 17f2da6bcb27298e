//! Flat snapshot tables read by the presentation layer
//!
//! Two tables, one row per (party, year, scope) and one row per
//! (party, decile, year, scope), written as CSV and/or as the JSON arrays
//! the dashboard fetches (`manifesto_impact.json`, `decile_impact.json`).

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Year;
use crate::aggregate::PopulationImpact;
use crate::batch::BatchConfig;
use crate::catalog::{ImpactScope, Party};
use crate::error::SnapshotError;

pub const MANIFESTO_TABLE: &str = "manifesto_impact";
pub const DECILE_TABLE: &str = "decile_impact";

pub const MANIFESTO_COLUMNS: [&str; 11] = [
    "manifesto",
    "cost",
    "benefits",
    "taxes",
    "povertyImpact",
    "childPovertyImpact",
    "adultPovertyImpact",
    "seniorPovertyImpact",
    "giniIndexImpact",
    "year",
    "includesIndirectImpacts",
];

pub const DECILE_COLUMNS: [&str; 5] = [
    "reform",
    "decile",
    "relativeIncomeChange",
    "year",
    "includesIndirectImpacts",
];

/// Parties are written by their manifesto name ("Labour Party")
mod manifesto_name {
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::catalog::Party;

    pub fn serialize<S: Serializer>(party: &Party, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(party.manifesto_name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Party, D::Error> {
        let name = String::deserialize(deserializer)?;
        Party::from_manifesto_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown party {name:?}")))
    }
}

/// Population impact of one party's manifesto in one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestoImpactRow {
    #[serde(with = "manifesto_name")]
    pub manifesto: Party,
    /// Fall in total household net income (£)
    pub cost: f64,
    /// Change in total benefits (£)
    pub benefits: f64,
    /// Change in total taxes (£)
    pub taxes: f64,
    pub poverty_impact: f64,
    pub child_poverty_impact: f64,
    pub adult_poverty_impact: f64,
    pub senior_poverty_impact: f64,
    pub gini_index_impact: f64,
    pub year: Year,
    pub includes_indirect_impacts: bool,
}

impl ManifestoImpactRow {
    pub fn new(party: Party, year: Year, scope: ImpactScope, impact: &PopulationImpact) -> Self {
        Self {
            manifesto: party,
            cost: impact.cost,
            benefits: impact.benefits,
            taxes: impact.taxes,
            poverty_impact: impact.poverty,
            child_poverty_impact: impact.child_poverty,
            adult_poverty_impact: impact.adult_poverty,
            senior_poverty_impact: impact.senior_poverty,
            gini_index_impact: impact.gini,
            year,
            includes_indirect_impacts: scope.includes_indirect(),
        }
    }

    pub fn scope(&self) -> ImpactScope {
        ImpactScope::from_include_indirect(self.includes_indirect_impacts)
    }
}

/// Relative net income change of one decile under one party's manifesto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecileImpactRow {
    #[serde(with = "manifesto_name")]
    pub reform: Party,
    pub decile: u8,
    /// Percent
    pub relative_income_change: f64,
    pub year: Year,
    pub includes_indirect_impacts: bool,
}

impl DecileImpactRow {
    pub fn scope(&self) -> ImpactScope {
        ImpactScope::from_include_indirect(self.includes_indirect_impacts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    #[default]
    Both,
}

impl ExportFormat {
    fn writes_csv(self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::Both)
    }

    fn writes_json(self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Both)
    }
}

/// Both snapshot tables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotSet {
    pub manifesto: Vec<ManifestoImpactRow>,
    pub deciles: Vec<DecileImpactRow>,
}

impl SnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.manifesto.is_empty() && self.deciles.is_empty()
    }

    /// Appends the rows of another set
    pub fn extend(&mut self, other: SnapshotSet) {
        self.manifesto.extend(other.manifesto);
        self.deciles.extend(other.deciles);
    }

    /// Orders rows by year, then indirect scope first, then party and decile
    pub fn sort(&mut self) {
        self.manifesto.sort_by_key(|r| (r.year, !r.includes_indirect_impacts, r.manifesto));
        self.deciles
            .sort_by_key(|r| (r.year, !r.includes_indirect_impacts, r.reform, r.decile));
    }

    /// Rows for one year and scope
    pub fn filter(&self, year: Year, scope: ImpactScope) -> SnapshotSet {
        let indirect = scope.includes_indirect();
        SnapshotSet {
            manifesto: self
                .manifesto
                .iter()
                .filter(|r| r.year == year && r.includes_indirect_impacts == indirect)
                .cloned()
                .collect(),
            deciles: self
                .deciles
                .iter()
                .filter(|r| r.year == year && r.includes_indirect_impacts == indirect)
                .cloned()
                .collect(),
        }
    }

    /// Distinct years present in the manifesto table, ascending
    pub fn years(&self) -> Vec<Year> {
        let mut years: Vec<Year> = self.manifesto.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Checks that every configured (party, year, scope) has exactly one
    /// manifesto row and one row per decile
    pub fn check_complete(&self, config: &BatchConfig) -> Result<(), SnapshotError> {
        for &year in &config.years {
            for &scope in &config.scopes {
                let slice = self.filter(year, scope);
                for &party in &config.parties {
                    let rows = slice.manifesto.iter().filter(|r| r.manifesto == party).count();
                    if rows != 1 {
                        return Err(SnapshotError::Incomplete(format!(
                            "{rows} manifesto rows for {party} in {year} ({scope})"
                        )));
                    }
                    let mut deciles: Vec<u8> = slice
                        .deciles
                        .iter()
                        .filter(|r| r.reform == party)
                        .map(|r| r.decile)
                        .collect();
                    deciles.sort_unstable();
                    if !deciles.iter().copied().eq(crate::aggregate::DECILES) {
                        return Err(SnapshotError::Incomplete(format!(
                            "deciles {deciles:?} for {party} in {year} ({scope})"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Writes both tables into `dir`, creating it if needed, and returns
    /// the paths written
    pub fn export_dir(
        &self,
        dir: impl AsRef<Path>,
        format: ExportFormat,
    ) -> Result<Vec<PathBuf>, SnapshotError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        if format.writes_csv() {
            written.push(write_csv(dir, MANIFESTO_TABLE, &self.manifesto)?);
            written.push(write_csv(dir, DECILE_TABLE, &self.deciles)?);
        }
        if format.writes_json() {
            written.push(write_json(dir, MANIFESTO_TABLE, &self.manifesto)?);
            written.push(write_json(dir, DECILE_TABLE, &self.deciles)?);
        }

        tracing::info!(
            dir = %dir.display(),
            manifesto_rows = self.manifesto.len(),
            decile_rows = self.deciles.len(),
            files = written.len(),
            "Exported snapshots"
        );
        Ok(written)
    }

    /// Loads both tables from `dir`, preferring CSV over JSON per table
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let dir = dir.as_ref();
        Ok(Self {
            manifesto: read_table(dir, MANIFESTO_TABLE, &MANIFESTO_COLUMNS)?,
            deciles: read_table(dir, DECILE_TABLE, &DECILE_COLUMNS)?,
        })
    }
}

fn write_csv<T: Serialize>(dir: &Path, table: &str, rows: &[T]) -> Result<PathBuf, SnapshotError> {
    let path = dir.join(format!("{table}.csv"));
    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(path)
}

fn write_json<T: Serialize>(dir: &Path, table: &str, rows: &[T]) -> Result<PathBuf, SnapshotError> {
    let path = dir.join(format!("{table}.json"));
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(path)
}

fn read_table<T: DeserializeOwned>(
    dir: &Path,
    table: &str,
    columns: &[&str],
) -> Result<Vec<T>, SnapshotError> {
    let csv_path = dir.join(format!("{table}.csv"));
    if csv_path.exists() {
        return read_csv(&csv_path, columns);
    }

    let json_path = dir.join(format!("{table}.json"));
    if json_path.exists() {
        let reader = BufReader::new(File::open(&json_path)?);
        return Ok(serde_json::from_reader(reader)?);
    }

    Err(SnapshotError::Io(format!(
        "no {table}.csv or {table}.json in {}",
        dir.display()
    )))
}

/// Reads a CSV table whose header must match `columns` exactly
pub fn read_csv<T: DeserializeOwned>(path: &Path, columns: &[&str]) -> Result<Vec<T>, SnapshotError> {
    let mut reader = csv::Reader::from_path(path)?;
    let found: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if !found.iter().map(String::as_str).eq(columns.iter().copied()) {
        return Err(SnapshotError::Schema {
            file: path.display().to_string(),
            expected: columns.iter().map(|c| c.to_string()).collect(),
            found,
        });
    }

    let rows = reader.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded snapshot table");
    Ok(rows)
}
