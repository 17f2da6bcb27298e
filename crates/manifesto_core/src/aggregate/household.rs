//! Household impact attribution
//!
//! Each metric is a row in a definition table: a signed combination of
//! per-variable differences (`reform.sum() - baseline.sum()`), the total
//! net income change, or the residual that closes the identity
//! `sum(explicit) + residual == total`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Year;
use crate::catalog::{Catalog, Party};
use crate::engine::{Simulation, SimulationEngine, Variable};
use crate::error::{EngineError, ImpactError};
use crate::reform::Reform;
use crate::situation::{HouseholdInput, build_situation};

/// How a metric is derived from variable differences
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricKind {
    /// Signed sum of variable differences
    Explicit(&'static [(Variable, f64)]),
    /// Change of a single variable; the reference for `Residual`
    Total(Variable),
    /// Total change not attributed to any explicit metric
    Residual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDefinition {
    pub label: &'static str,
    pub kind: MetricKind,
}

impl MetricDefinition {
    const fn explicit(label: &'static str, terms: &'static [(Variable, f64)]) -> Self {
        Self {
            label,
            kind: MetricKind::Explicit(terms),
        }
    }
}

/// Household metrics in report order. Tax metrics are negated so that a
/// tax rise shows as a loss to the household.
pub const HOUSEHOLD_METRICS: [MetricDefinition; 9] = [
    MetricDefinition::explicit(
        "Child Benefit tax charge",
        &[(Variable::ChildBenefitCharge, -1.0)],
    ),
    // Income tax changes net of the child benefit charge, which income tax includes
    MetricDefinition::explicit(
        "Triple Lock Plus",
        &[(Variable::IncomeTax, -1.0), (Variable::ChildBenefitCharge, 1.0)],
    ),
    MetricDefinition::explicit("National Insurance", &[(Variable::NationalInsurance, -1.0)]),
    MetricDefinition::explicit("Stamp Duty", &[(Variable::StampDuty, -1.0)]),
    MetricDefinition::explicit("Private School VAT", &[(Variable::PrivateSchoolVat, -1.0)]),
    MetricDefinition::explicit("Capital Gains Tax", &[(Variable::CapitalGainsTax, -1.0)]),
    MetricDefinition::explicit("Universal Credit", &[(Variable::UniversalCredit, 1.0)]),
    MetricDefinition {
        label: "Indirect impacts",
        kind: MetricKind::Residual,
    },
    MetricDefinition {
        label: "Net change",
        kind: MetricKind::Total(Variable::HouseholdNetIncome),
    },
];

/// One (metric, value, party) line of a household impact report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRow {
    pub metric: String,
    pub value: f64,
    pub party: Party,
}

/// A party's household impact, one row per metric in table order
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdImpact {
    pub party: Party,
    pub rows: Vec<ImpactRow>,
}

impl HouseholdImpact {
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.metric == metric).map(|r| r.value)
    }

    pub fn net_change(&self) -> Option<f64> {
        self.value("Net change")
    }
}

/// Evaluates `metrics` for `reformed` against `baseline` in `year`,
/// returning `(label, value)` pairs in table order
pub fn attribute(
    metrics: &[MetricDefinition],
    baseline: &impl Simulation,
    reformed: &impl Simulation,
    year: Year,
) -> Result<Vec<(&'static str, f64)>, EngineError> {
    let mut differences: BTreeMap<Variable, f64> = BTreeMap::new();
    let mut diff = |variable: Variable| -> Result<f64, EngineError> {
        if let Some(value) = differences.get(&variable) {
            return Ok(*value);
        }
        let value = reformed.calculate(variable, year)?.sum() - baseline.calculate(variable, year)?.sum();
        differences.insert(variable, value);
        Ok(value)
    };

    let mut values = Vec::with_capacity(metrics.len());
    let mut explicit_total = 0.0;
    let mut total = None;
    for metric in metrics {
        let value = match metric.kind {
            MetricKind::Explicit(terms) => {
                let mut value = 0.0;
                for (variable, sign) in terms {
                    value += sign * diff(*variable)?;
                }
                explicit_total += value;
                Some(value)
            }
            MetricKind::Total(variable) => {
                let value = diff(variable)?;
                total.get_or_insert(value);
                Some(value)
            }
            MetricKind::Residual => None,
        };
        values.push((metric.label, value));
    }

    let residual = total.unwrap_or(0.0) - explicit_total;
    Ok(values
        .into_iter()
        .map(|(label, value)| (label, value.unwrap_or(residual)))
        .collect())
}

/// Builds the household from `input` and attributes its net income change
/// under every party's reform for `input.year` and `input.scope()`
pub fn household_impacts<E: SimulationEngine>(
    engine: &E,
    catalog: &Catalog,
    input: &HouseholdInput,
) -> Result<Vec<HouseholdImpact>, ImpactError> {
    let situation = build_situation(input)?;
    let scope = input.scope();
    let baseline = engine.household(&situation, &Reform::baseline())?;

    tracing::debug!(year = input.year, %scope, people = situation.people.len(), "Computing household impacts");

    catalog
        .all(scope)
        .map(|(party, reform)| -> Result<HouseholdImpact, ImpactError> {
            let reformed = engine.household(&situation, reform)?;
            let rows = attribute(&HOUSEHOLD_METRICS, &baseline, &reformed, input.year)?
                .into_iter()
                .map(|(metric, value)| ImpactRow {
                    metric: metric.to_string(),
                    value,
                    party,
                })
                .collect();
            Ok(HouseholdImpact { party, rows })
        })
        .collect()
}
