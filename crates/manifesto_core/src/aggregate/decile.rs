//! Relative net income change by baseline income decile

use crate::Year;
use crate::engine::{Simulation, Variable};
use crate::error::EngineError;

pub const DECILES: std::ops::RangeInclusive<u8> = 1..=10;

/// Percentage change in total net income per decile 1..=10.
///
/// Households are placed by their baseline decile so both simulations are
/// grouped identically; a decile with no households (or zero baseline
/// income) reports zero.
pub fn decile_impacts(
    baseline: &impl Simulation,
    reformed: &impl Simulation,
    year: Year,
) -> Result<[f64; 10], EngineError> {
    let decile = baseline
        .calculate(Variable::HouseholdIncomeDecile, year)?
        .clip(f64::from(*DECILES.start()), f64::from(*DECILES.end()));
    let baseline_income = baseline.calculate(Variable::HouseholdNetIncome, year)?;
    let reform_income = reformed.calculate(Variable::HouseholdNetIncome, year)?;

    let change = reform_income.difference(&baseline_income)?;
    let change_by_decile = change.group_sum(&decile)?;
    let income_by_decile = baseline_income.group_sum(&decile)?;

    let mut impacts = [0.0; 10];
    for (key, income) in income_by_decile {
        let Some(slot) = usize::try_from(key - 1).ok().and_then(|i| impacts.get_mut(i)) else {
            continue;
        };
        let gain = change_by_decile
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0.0, |(_, v)| *v);
        *slot = if income == 0.0 { 0.0 } else { gain / income * 100.0 };
    }
    Ok(impacts)
}
