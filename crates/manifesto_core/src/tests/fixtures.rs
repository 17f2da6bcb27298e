//! Recorded engines built from synthetic outputs

use crate::Year;
use crate::catalog::{Catalog, ImpactScope, Party};
use crate::engine::{MicroSeries, ReplayEngine, Variable};
use crate::reform::Reform;
use crate::situation::{HouseholdInput, build_situation};

/// Baseline outputs for a single earner on £20,000
pub const BASELINE_HOUSEHOLD: [(Variable, f64); 8] = [
    (Variable::HouseholdNetIncome, 17_120.0),
    (Variable::ChildBenefitCharge, 0.0),
    (Variable::IncomeTax, 1_486.0),
    (Variable::NationalInsurance, 594.4),
    (Variable::StampDuty, 0.0),
    (Variable::PrivateSchoolVat, 0.0),
    (Variable::CapitalGainsTax, 0.0),
    (Variable::UniversalCredit, 0.0),
];

/// Baseline outputs with some variables replaced
pub fn household_outputs(changes: &[(Variable, f64)]) -> Vec<(Variable, f64)> {
    BASELINE_HOUSEHOLD
        .iter()
        .map(|&(variable, base)| {
            let value = changes
                .iter()
                .find(|(v, _)| *v == variable)
                .map_or(base, |(_, value)| *value);
            (variable, value)
        })
        .collect()
}

pub fn record_household(
    engine: &mut ReplayEngine,
    input: &HouseholdInput,
    reform: &Reform,
    outputs: &[(Variable, f64)],
) {
    let situation = build_situation(input).unwrap();
    for &(variable, value) in outputs {
        engine.record_household(&situation, reform, input.year, variable, MicroSeries::scalar(value));
    }
}

/// Household outputs per party: an NI cut for the Conservatives and an
/// indirect net income effect for every party in the full scope only
pub fn party_household_outputs(party: Party, scope: ImpactScope) -> Vec<(Variable, f64)> {
    let indirect = if scope.includes_indirect() { 1.0 } else { 0.0 };
    match party {
        Party::Conservatives => household_outputs(&[
            (Variable::NationalInsurance, 474.4),
            (Variable::HouseholdNetIncome, 17_120.0 + 120.0 - 35.5 * indirect),
        ]),
        Party::Labour => household_outputs(&[(
            Variable::HouseholdNetIncome,
            17_120.0 - 22.25 * indirect,
        )]),
        Party::LiberalDemocrats => household_outputs(&[(
            Variable::HouseholdNetIncome,
            17_120.0 - 61.0 * indirect,
        )]),
    }
}

/// Engine with the baseline and every party reform recorded for `input`
pub fn household_engine(catalog: &Catalog, input: &HouseholdInput) -> ReplayEngine {
    let mut engine = ReplayEngine::new();
    record_household(&mut engine, input, &Reform::baseline(), &BASELINE_HOUSEHOLD);
    for scope in ImpactScope::ALL {
        for (party, reform) in catalog.all(scope) {
            record_household(&mut engine, input, reform, &party_household_outputs(party, scope));
        }
    }
    engine
}

// ============================================================================
// Synthetic population
// ============================================================================

/// Twenty households of two people each, one per income step, two per decile
pub const HOUSEHOLDS: usize = 20;

/// A synthetic population simulation.
///
/// `income_change` scales every household's net income; `poor_households`
/// is how many of the poorest households are in poverty.
pub fn population_outputs(
    year: Year,
    income_change: f64,
    poor_households: usize,
) -> Vec<(Variable, MicroSeries)> {
    let growth = 1.0 + 0.02 * f64::from(year - 2025);
    let household_weights = vec![1_000.0; HOUSEHOLDS];
    let person_weights = vec![1_000.0; HOUSEHOLDS * 2];

    let household = |f: &dyn Fn(usize) -> f64| {
        MicroSeries::new((0..HOUSEHOLDS).map(f).collect(), household_weights.clone()).unwrap()
    };
    let person = |f: &dyn Fn(usize) -> bool| {
        let values = (0..HOUSEHOLDS * 2)
            .map(|p| if f(p) { 1.0 } else { 0.0 })
            .collect();
        MicroSeries::new(values, person_weights.clone()).unwrap()
    };

    let net_income = |i: usize| (10_000.0 + 5_000.0 * i as f64) * growth * (1.0 + income_change);

    vec![
        (Variable::HouseholdNetIncome, household(&net_income)),
        (
            Variable::HouseholdBenefits,
            household(&|i| (8_000.0 - 400.0 * i as f64) * (1.0 + income_change)),
        ),
        (
            Variable::HouseholdTax,
            household(&|i| 1_000.0 * i as f64 * (1.0 - income_change)),
        ),
        (
            Variable::EquivHouseholdNetIncome,
            household(&|i| net_income(i) / 1.5),
        ),
        (Variable::HouseholdCountPeople, household(&|_| 2.0)),
        (
            Variable::HouseholdIncomeDecile,
            household(&|i| (i / 2 + 1) as f64),
        ),
        (Variable::InPoverty, person(&|p| p / 2 < poor_households)),
        (Variable::IsChild, person(&|p| p % 2 == 1 && p / 2 < 10)),
        (
            Variable::IsWorkingAgeAdult,
            person(&|p| p / 2 < 15 && (p % 2 == 0 || p / 2 >= 10)),
        ),
        (Variable::AgeOver64, person(&|p| p / 2 >= 15)),
    ]
}

pub fn record_population(
    engine: &mut ReplayEngine,
    reform: &Reform,
    years: &[Year],
    income_change: f64,
    poor_households: usize,
) {
    for &year in years {
        for (variable, series) in population_outputs(year, income_change, poor_households) {
            engine.record_population(reform, year, variable, series);
        }
    }
}

/// Relative net income change each party's reform applies in `scope`
pub fn party_income_change(party: Party, scope: ImpactScope) -> f64 {
    let full = match party {
        Party::Conservatives => -0.01,
        Party::Labour => 0.005,
        Party::LiberalDemocrats => 0.02,
    };
    if scope.includes_indirect() { full } else { full / 2.0 }
}

/// Engine with the baseline and every party reform recorded for `years`
pub fn population_engine(catalog: &Catalog, years: &[Year]) -> ReplayEngine {
    let mut engine = ReplayEngine::new();
    record_population(&mut engine, &Reform::baseline(), years, 0.0, 4);
    for scope in ImpactScope::ALL {
        for (party, reform) in catalog.all(scope) {
            let change = party_income_change(party, scope);
            let poor = if change > 0.0 { 3 } else { 5 };
            record_population(&mut engine, reform, years, change, poor);
        }
    }
    engine
}
