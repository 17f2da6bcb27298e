//! Handler tests against recorded simulations and in-memory snapshots

use axum::Json;
use axum::body::Body;
use axum::extract::{FromRequest, Query, State};
use axum::http::{Request, StatusCode, header};
use axum::response::IntoResponse;
use manifesto_core::aggregate::PopulationImpact;
use manifesto_core::situation::build_situation;
use manifesto_core::{
    Catalog, DecileImpactRow, HouseholdInput, ImpactScope, ManifestoImpactRow, MicroSeries, Party,
    Reform, ReplayEngine, SnapshotSet, Variable,
};

use crate::error::ApiError;
use crate::handlers::{
    ImpactQuery, calculate_household, list_decile_impacts, list_manifesto_impacts,
};
use crate::state::AppState;

/// Records the default household: every party cuts NI by £100.123
fn household_engine(catalog: &Catalog) -> ReplayEngine {
    let input = HouseholdInput::default();
    let situation = build_situation(&input).unwrap();
    let baseline = |variable: Variable| match variable {
        Variable::HouseholdNetIncome => 17_120.0,
        Variable::NationalInsurance => 594.4,
        _ => 0.0,
    };

    let mut engine = ReplayEngine::new();
    for variable in Variable::ALL {
        engine.record_household(
            &situation,
            &Reform::baseline(),
            input.year,
            variable,
            MicroSeries::scalar(baseline(variable)),
        );
    }
    for (_, reform) in catalog.all(ImpactScope::DirectAndIndirect) {
        for variable in Variable::ALL {
            let value = match variable {
                Variable::HouseholdNetIncome => 17_220.123,
                Variable::NationalInsurance => 494.277,
                other => baseline(other),
            };
            engine.record_household(&situation, reform, input.year, variable, MicroSeries::scalar(value));
        }
    }
    engine
}

fn snapshots() -> SnapshotSet {
    let mut set = SnapshotSet::new();
    for year in [2027, 2028] {
        for scope in ImpactScope::ALL {
            for party in Party::ALL {
                let impact = PopulationImpact {
                    cost: 1.0e9,
                    poverty: -0.5,
                    ..Default::default()
                };
                set.manifesto.push(ManifestoImpactRow::new(party, year, scope, &impact));
                set.deciles.extend((1..=10).map(|decile| DecileImpactRow {
                    reform: party,
                    decile,
                    relative_income_change: 0.1 * f64::from(decile),
                    year,
                    includes_indirect_impacts: scope.includes_indirect(),
                }));
            }
        }
    }
    set
}

fn test_state(with_snapshots: bool) -> AppState {
    let catalog = Catalog::load().unwrap();
    let engine = household_engine(&catalog);
    AppState::new(engine, catalog, with_snapshots.then(snapshots))
}

fn status(err: ApiError) -> StatusCode {
    err.into_response().status()
}

fn query(year: Option<i16>, include_indirect: Option<bool>) -> Query<ImpactQuery> {
    Query(ImpactQuery {
        year,
        include_indirect,
    })
}

/// Test the household response shape and rounding
#[tokio::test]
async fn test_household_rows() {
    let Json(rows) = calculate_household(State(test_state(false)), Ok(Json(HouseholdInput::default())))
        .await
        .unwrap();

    assert_eq!(rows.len(), 3 * 9);
    assert_eq!(rows[0].party, Party::Conservatives);
    assert_eq!(rows[0].metric, "Child Benefit tax charge");
    assert_eq!(rows[9].party, Party::Labour);

    let ni: Vec<f64> = rows
        .iter()
        .filter(|r| r.metric == "National Insurance")
        .map(|r| r.value)
        .collect();
    assert_eq!(ni, [100.12, 100.12, 100.12]);
    assert!(
        rows.iter()
            .filter(|r| r.metric == "Net change")
            .all(|r| r.value == 100.12)
    );
    assert!(
        rows.iter()
            .filter(|r| r.metric == "Indirect impacts")
            .all(|r| r.value == 0.0)
    );
}

/// Test that invalid input is a client error naming the field
#[tokio::test]
async fn test_household_validation() {
    let input = HouseholdInput {
        age: 200,
        ..Default::default()
    };
    let err = calculate_household(State(test_state(false)), Ok(Json(input)))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("age"));
    assert_eq!(status(err), StatusCode::BAD_REQUEST);
}

/// Test that an unparseable body gets the JSON error shape
#[tokio::test]
async fn test_household_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/household")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"income": "lots"}"#))
        .unwrap();
    let rejection = Json::<HouseholdInput>::from_request(request, &())
        .await
        .unwrap_err();

    let err = calculate_household(State(test_state(false)), Err(rejection))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
}

/// Test that a household outside the recording is reported as not found
#[tokio::test]
async fn test_household_not_recorded() {
    let input = HouseholdInput {
        include_indirect: false,
        ..Default::default()
    };
    let err = calculate_household(State(test_state(false)), Ok(Json(input)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotRecorded(_)));
    assert_eq!(status(err), StatusCode::NOT_FOUND);
}

/// Test filtering manifesto impacts by year and scope
#[tokio::test]
async fn test_manifesto_impacts_filtered() {
    let Json(rows) = list_manifesto_impacts(State(test_state(true)), query(Some(2028), Some(false)))
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.year == 2028 && !r.includes_indirect_impacts));
    assert_eq!(rows[1].manifesto, Party::Labour);
    assert_eq!(rows[0].cost, 1.0e9);

    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[1]["manifesto"], "Labour Party");

    let Json(all) = list_manifesto_impacts(State(test_state(true)), query(None, None))
        .await
        .unwrap();
    assert_eq!(all.len(), 12);
}

/// Test decile filtering and year validation
#[tokio::test]
async fn test_decile_impacts() {
    let Json(rows) = list_decile_impacts(State(test_state(true)), query(Some(2027), Some(true)))
        .await
        .unwrap();
    assert_eq!(rows.len(), 30);
    assert!(rows.iter().all(|r| r.includes_indirect_impacts));

    let err = list_decile_impacts(State(test_state(true)), query(Some(2040), None))
        .await
        .unwrap_err();
    assert_eq!(status(err), StatusCode::BAD_REQUEST);
}

/// Test that snapshot handlers report missing snapshots
#[tokio::test]
async fn test_snapshots_unavailable() {
    let err = list_manifesto_impacts(State(test_state(false)), query(None, None))
        .await
        .unwrap_err();
    assert_eq!(status(err), StatusCode::SERVICE_UNAVAILABLE);
}
