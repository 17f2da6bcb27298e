//! Tests for household impact attribution
//!
//! These tests verify:
//! - Explicit metrics plus the residual always add up to the net change
//! - Tax rises show as losses and benefit rises as gains
//! - Repeated runs give identical output
//! - A reform that changes nothing yields all-zero rows

use super::fixtures::{BASELINE_HOUSEHOLD, household_engine, household_outputs, record_household};
use crate::aggregate::{HOUSEHOLD_METRICS, MetricKind, attribute, household_impacts};
use crate::catalog::{Catalog, ImpactScope, Party};
use crate::engine::{ReplayEngine, SimulationEngine, Variable};
use crate::error::{EngineError, ImpactError, InputError};
use crate::reform::Reform;
use crate::situation::{HouseholdInput, build_situation};

const TOLERANCE: f64 = 1e-6;

fn explicit_sum(values: &[(&str, f64)]) -> f64 {
    HOUSEHOLD_METRICS
        .iter()
        .zip(values)
        .filter(|(m, _)| matches!(m.kind, MetricKind::Explicit(_)))
        .map(|(_, (_, v))| v)
        .sum()
}

/// Engine with the baseline and a single arbitrary reform recorded
fn single_reform_engine(outputs: &[(Variable, f64)]) -> (ReplayEngine, HouseholdInput, Reform) {
    let input = HouseholdInput::default();
    let reform = Catalog::load()
        .unwrap()
        .reform(Party::Conservatives, ImpactScope::Direct)
        .clone();
    let mut engine = ReplayEngine::new();
    record_household(&mut engine, &input, &Reform::baseline(), &BASELINE_HOUSEHOLD);
    record_household(&mut engine, &input, &reform, outputs);
    (engine, input, reform)
}

fn attribute_reform(outputs: &[(Variable, f64)]) -> Vec<(&'static str, f64)> {
    let (engine, input, reform) = single_reform_engine(outputs);
    let situation = build_situation(&input).unwrap();
    let baseline = engine.household(&situation, &Reform::baseline()).unwrap();
    let reformed = engine.household(&situation, &reform).unwrap();
    attribute(&HOUSEHOLD_METRICS, &baseline, &reformed, input.year).unwrap()
}

fn value(values: &[(&str, f64)], metric: &str) -> f64 {
    values
        .iter()
        .find(|(label, _)| *label == metric)
        .map(|(_, v)| *v)
        .unwrap()
}

/// Test the identity sum(explicit) + residual == net change for every party
#[test]
fn test_accounting_identity_for_every_party() {
    let catalog = Catalog::load().unwrap();
    for include_indirect in [true, false] {
        let input = HouseholdInput {
            include_indirect,
            ..Default::default()
        };
        let engine = household_engine(&catalog, &input);
        let impacts = household_impacts(&engine, &catalog, &input).unwrap();
        assert_eq!(impacts.len(), 3);

        for impact in &impacts {
            let values: Vec<(&str, f64)> =
                impact.rows.iter().map(|r| (r.metric.as_str(), r.value)).collect();
            let residual = impact.value("Indirect impacts").unwrap();
            let net = impact.net_change().unwrap();
            assert!(
                (explicit_sum(&values) + residual - net).abs() < TOLERANCE,
                "identity broken for {}",
                impact.party
            );
        }
    }
}

/// Test the identity with every tracked lever moving at once
#[test]
fn test_accounting_identity_with_all_levers() {
    let values = attribute_reform(&household_outputs(&[
        (Variable::HouseholdNetIncome, 16_000.0),
        (Variable::ChildBenefitCharge, 310.0),
        (Variable::IncomeTax, 1_900.0),
        (Variable::NationalInsurance, 500.0),
        (Variable::StampDuty, 1_250.0),
        (Variable::PrivateSchoolVat, 2_400.0),
        (Variable::CapitalGainsTax, 75.0),
        (Variable::UniversalCredit, 1_020.0),
    ]));
    let residual = value(&values, "Indirect impacts");
    let net = value(&values, "Net change");
    assert!((explicit_sum(&values) + residual - net).abs() < TOLERANCE);
}

/// Test that tax rises are losses and benefit rises are gains
#[test]
fn test_sign_convention() {
    let raised = attribute_reform(&household_outputs(&[
        (Variable::NationalInsurance, 694.4),
        (Variable::StampDuty, 500.0),
        (Variable::UniversalCredit, 250.0),
    ]));
    assert!((value(&raised, "National Insurance") + 100.0).abs() < TOLERANCE);
    assert!((value(&raised, "Stamp Duty") + 500.0).abs() < TOLERANCE);
    assert!((value(&raised, "Universal Credit") - 250.0).abs() < TOLERANCE);

    let cut = attribute_reform(&household_outputs(&[(Variable::IncomeTax, 1_386.0)]));
    assert!(value(&cut, "Triple Lock Plus") > 0.0);
}

/// Test that the child benefit charge is not counted twice through income tax
#[test]
fn test_child_benefit_charge_is_separated_from_income_tax() {
    // Income tax includes the charge, so a pure charge rise moves both
    let values = attribute_reform(&household_outputs(&[
        (Variable::ChildBenefitCharge, 200.0),
        (Variable::IncomeTax, 1_686.0),
        (Variable::HouseholdNetIncome, 16_920.0),
    ]));
    assert!((value(&values, "Child Benefit tax charge") + 200.0).abs() < TOLERANCE);
    assert!(value(&values, "Triple Lock Plus").abs() < TOLERANCE);
    assert!(value(&values, "Indirect impacts").abs() < TOLERANCE);
}

/// Test the worked example: net change is R - B and the residual is (R - B) - X
#[test]
fn test_worked_example() {
    let values = attribute_reform(&household_outputs(&[
        (Variable::HouseholdNetIncome, 17_620.0),
        (Variable::NationalInsurance, 394.4),
        (Variable::UniversalCredit, 100.0),
    ]));
    let net = value(&values, "Net change");
    assert!((net - 500.0).abs() < TOLERANCE);

    // NI cut of 200 and UC rise of 100 explain 300 of the 500
    assert!((value(&values, "Indirect impacts") - 200.0).abs() < TOLERANCE);
}

/// Test that a reform with no effect yields all-zero rows
#[test]
fn test_baseline_self_consistency() {
    let values = attribute_reform(&BASELINE_HOUSEHOLD);
    assert_eq!(values.len(), HOUSEHOLD_METRICS.len());
    assert!(values.iter().all(|(_, v)| *v == 0.0));
}

/// Test that computing twice gives identical output
#[test]
fn test_idempotence() {
    let catalog = Catalog::load().unwrap();
    let input = HouseholdInput::default();
    let engine = household_engine(&catalog, &input);
    let first = household_impacts(&engine, &catalog, &input).unwrap();
    let second = household_impacts(&engine, &catalog, &input).unwrap();
    assert_eq!(first, second);
}

/// Test report order and party tagging
#[test]
fn test_rows_follow_metric_table() {
    let catalog = Catalog::load().unwrap();
    let input = HouseholdInput::default();
    let engine = household_engine(&catalog, &input);
    let impacts = household_impacts(&engine, &catalog, &input).unwrap();

    let parties: Vec<Party> = impacts.iter().map(|i| i.party).collect();
    assert_eq!(parties, Party::ALL);

    for impact in &impacts {
        let labels: Vec<&str> = impact.rows.iter().map(|r| r.metric.as_str()).collect();
        let expected: Vec<&str> = HOUSEHOLD_METRICS.iter().map(|m| m.label).collect();
        assert_eq!(labels, expected);
        assert!(impact.rows.iter().all(|r| r.party == impact.party));
    }

    let conservatives = &impacts[0];
    assert!((conservatives.value("National Insurance").unwrap() - 120.0).abs() < TOLERANCE);
    assert!((conservatives.value("Indirect impacts").unwrap() + 35.5).abs() < TOLERANCE);
}

/// Test that the direct scope drops the indirect residual in the fixture
#[test]
fn test_direct_scope_uses_direct_reforms() {
    let catalog = Catalog::load().unwrap();
    let input = HouseholdInput {
        include_indirect: false,
        ..Default::default()
    };
    let engine = household_engine(&catalog, &input);
    let impacts = household_impacts(&engine, &catalog, &input).unwrap();
    for impact in impacts {
        assert!(impact.value("Indirect impacts").unwrap().abs() < TOLERANCE);
    }
}

/// Test error propagation for missing variables and invalid input
#[test]
fn test_errors_propagate() {
    let (mut engine, input, _) = single_reform_engine(&BASELINE_HOUSEHOLD);
    let catalog = Catalog::load().unwrap();
    let err = household_impacts(&engine, &catalog, &input).unwrap_err();
    assert!(matches!(
        err,
        ImpactError::Engine(EngineError::MissingRecording { .. })
    ));

    // Record every reform but leave one variable out of the Labour simulation
    for scope in ImpactScope::ALL {
        for (party, reform) in catalog.all(scope) {
            let outputs: Vec<_> = BASELINE_HOUSEHOLD
                .iter()
                .copied()
                .filter(|(v, _)| party != Party::Labour || *v != Variable::UniversalCredit)
                .collect();
            record_household(&mut engine, &input, reform, &outputs);
        }
    }
    let err = household_impacts(&engine, &catalog, &input).unwrap_err();
    assert_eq!(
        err,
        ImpactError::Engine(EngineError::MissingVariable {
            variable: "universal_credit",
            year: 2028,
        })
    );

    let invalid = HouseholdInput {
        age: 130,
        ..Default::default()
    };
    assert!(matches!(
        household_impacts(&engine, &catalog, &invalid),
        Err(ImpactError::Input(InputError::OutOfRange { field: "age", .. }))
    ));
}
