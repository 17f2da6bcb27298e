//! Criterion benchmarks for manifesto_core aggregation
//!
//! Run with: cargo bench -p manifesto_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use manifesto_core::aggregate::{HOUSEHOLD_METRICS, PopulationSummary, attribute};
use manifesto_core::situation::build_situation;
use manifesto_core::{
    BatchConfig, Catalog, HouseholdInput, ImpactScope, MicroSeries, Reform, ReplayEngine,
    SimulationEngine, Variable, Year, run_batch,
};

const YEARS: [Year; 4] = [2025, 2026, 2027, 2028];

/// A population of `households` two-person households with spread incomes
fn record_population(engine: &mut ReplayEngine, reform: &Reform, households: usize, change: f64) {
    let household = |f: &dyn Fn(usize) -> f64| {
        MicroSeries::new(
            (0..households).map(f).collect(),
            (0..households).map(|i| 500.0 + (i % 7) as f64 * 100.0).collect(),
        )
        .unwrap()
    };
    let person = |f: &dyn Fn(usize) -> bool| {
        MicroSeries::new(
            (0..households * 2).map(|p| if f(p) { 1.0 } else { 0.0 }).collect(),
            vec![1_000.0; households * 2],
        )
        .unwrap()
    };
    let income = |i: usize| (8_000.0 + (i * 7_919 % 120_000) as f64) * (1.0 + change);

    for year in YEARS {
        let outputs = [
            (Variable::HouseholdNetIncome, household(&income)),
            (Variable::HouseholdBenefits, household(&|i| 6_000.0 - (i % 60) as f64 * 100.0)),
            (Variable::HouseholdTax, household(&|i| income(i) * 0.2)),
            (Variable::EquivHouseholdNetIncome, household(&|i| income(i) / 1.5)),
            (Variable::HouseholdCountPeople, household(&|_| 2.0)),
            (Variable::HouseholdIncomeDecile, household(&|i| (i % 10 + 1) as f64)),
            (Variable::InPoverty, person(&|p| p % 9 == 0)),
            (Variable::IsChild, person(&|p| p % 2 == 1)),
            (Variable::IsWorkingAgeAdult, person(&|p| p % 4 == 0)),
            (Variable::AgeOver64, person(&|p| p % 4 == 2)),
        ];
        for (variable, series) in outputs {
            engine.record_population(reform, year, variable, series);
        }
    }
}

fn population_engine(catalog: &Catalog, households: usize) -> ReplayEngine {
    let mut engine = ReplayEngine::new();
    record_population(&mut engine, &Reform::baseline(), households, 0.0);
    for scope in ImpactScope::ALL {
        for (i, (_, reform)) in catalog.all(scope).enumerate() {
            record_population(&mut engine, reform, households, 0.01 * i as f64 - 0.01);
        }
    }
    engine
}

fn bench_household_attribution(c: &mut Criterion) {
    let catalog = Catalog::load().unwrap();
    let input = HouseholdInput::default();
    let situation = build_situation(&input).unwrap();
    let reform = catalog.reform(manifesto_core::Party::Conservatives, ImpactScope::DirectAndIndirect);

    let mut engine = ReplayEngine::new();
    for (r, shift) in [(&Reform::baseline(), 0.0), (reform, 50.0)] {
        for variable in Variable::ALL {
            engine.record_household(&situation, r, input.year, variable, MicroSeries::scalar(1_000.0 + shift));
        }
    }
    let baseline = engine.household(&situation, &Reform::baseline()).unwrap();
    let reformed = engine.household(&situation, reform).unwrap();

    c.bench_function("household_attribution", |b| {
        b.iter(|| {
            attribute(
                black_box(&HOUSEHOLD_METRICS),
                black_box(&baseline),
                black_box(&reformed),
                input.year,
            )
        })
    });
}

fn bench_gini(c: &mut Criterion) {
    let mut group = c.benchmark_group("gini");

    for size in [1_000, 10_000, 50_000].iter() {
        let series = MicroSeries::new(
            (0..*size).map(|i| (i * 7_919 % 100_000) as f64).collect(),
            (0..*size).map(|i| 1.0 + (i % 5) as f64).collect(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::new("households", size), size, |b, _| {
            b.iter(|| black_box(&series).gini())
        });
    }

    group.finish();
}

fn bench_population_summary(c: &mut Criterion) {
    let catalog = Catalog::load().unwrap();
    let engine = population_engine(&catalog, 20_000);
    let baseline = engine.population(&Reform::baseline()).unwrap();

    c.bench_function("population_summary_20k", |b| {
        b.iter(|| PopulationSummary::compute(black_box(&baseline), black_box(2028)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let catalog = Catalog::load().unwrap();
    let config = BatchConfig::default();

    for households in [1_000, 10_000].iter() {
        let engine = population_engine(&catalog, *households);
        group.bench_with_input(
            BenchmarkId::new("households", households),
            households,
            |b, _| b.iter(|| run_batch(black_box(&engine), &catalog, black_box(&config), None)),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_household_attribution,
    bench_gini,
    bench_population_summary,
    bench_batch,
);
criterion_main!(benches);
