//! Population-level reductions and their baseline comparison

use serde::{Deserialize, Serialize};

use super::relative_change;
use crate::Year;
use crate::engine::{Simulation, Variable};
use crate::error::EngineError;

/// Headline statistics of one population simulation in one year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationSummary {
    /// Total household net income (£)
    pub net_income: f64,
    /// Total household benefits (£)
    pub benefits: f64,
    /// Total household tax (£)
    pub taxes: f64,
    /// Share of people in poverty
    pub poverty: f64,
    pub child_poverty: f64,
    pub adult_poverty: f64,
    pub senior_poverty: f64,
    /// Gini coefficient of equivalised household net income, person-weighted
    pub gini: f64,
}

impl PopulationSummary {
    pub fn compute(sim: &impl Simulation, year: Year) -> Result<Self, EngineError> {
        let poverty = sim.calculate(Variable::InPoverty, year)?;
        let poverty_among = |group: Variable| -> Result<f64, EngineError> {
            let mask = sim.calculate(group, year)?;
            Ok(poverty.filter(&mask)?.mean())
        };

        let equiv_income = sim.calculate(Variable::EquivHouseholdNetIncome, year)?;
        let people = sim.calculate(Variable::HouseholdCountPeople, year)?;

        Ok(Self {
            net_income: sim.calculate(Variable::HouseholdNetIncome, year)?.sum(),
            benefits: sim.calculate(Variable::HouseholdBenefits, year)?.sum(),
            taxes: sim.calculate(Variable::HouseholdTax, year)?.sum(),
            poverty: poverty.mean(),
            child_poverty: poverty_among(Variable::IsChild)?,
            adult_poverty: poverty_among(Variable::IsWorkingAgeAdult)?,
            senior_poverty: poverty_among(Variable::AgeOver64)?,
            gini: equiv_income.scale_weights(&people)?.gini(),
        })
    }
}

/// A reform's population impact against the baseline.
///
/// Money fields are absolute £ changes; the rest are relative changes in
/// percent, negative when the statistic falls.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationImpact {
    /// Fall in household net income (positive when households lose)
    pub cost: f64,
    pub benefits: f64,
    pub taxes: f64,
    pub poverty: f64,
    pub child_poverty: f64,
    pub adult_poverty: f64,
    pub senior_poverty: f64,
    pub gini: f64,
}

impl PopulationImpact {
    pub fn between(baseline: &PopulationSummary, reform: &PopulationSummary) -> Self {
        Self {
            cost: baseline.net_income - reform.net_income,
            benefits: reform.benefits - baseline.benefits,
            taxes: reform.taxes - baseline.taxes,
            poverty: relative_change(baseline.poverty, reform.poverty),
            child_poverty: relative_change(baseline.child_poverty, reform.child_poverty),
            adult_poverty: relative_change(baseline.adult_poverty, reform.adult_poverty),
            senior_poverty: relative_change(baseline.senior_poverty, reform.senior_poverty),
            gini: relative_change(baseline.gini, reform.gini),
        }
    }
}
