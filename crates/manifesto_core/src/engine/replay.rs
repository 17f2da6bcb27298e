//! Replay engine backed by recorded simulation outputs
//!
//! A recording holds outputs previously produced by the microsimulation
//! engine, keyed by the exact reform (and, for households, the exact
//! situation) they were computed for:
//!
//! ```json
//! {
//!   "population": [
//!     { "reform": {}, "years": { "2028": { "household_net_income": { "values": [...], "weights": [...] } } } }
//!   ],
//!   "households": [
//!     { "situation": { ... }, "reform": { ... }, "years": { "2028": { "income_tax": { "values": [1200.0] } } } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{MicroSeries, Simulation, SimulationEngine, Variable};
use crate::Year;
use crate::error::EngineError;
use crate::reform::Reform;
use crate::situation::Situation;

type Outputs = BTreeMap<Year, BTreeMap<Variable, MicroSeries>>;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecordingFile {
    #[serde(default)]
    population: Vec<PopulationRecord>,
    #[serde(default)]
    households: Vec<HouseholdRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PopulationRecord {
    reform: Reform,
    years: Outputs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HouseholdRecord {
    situation: Situation,
    reform: Reform,
    years: Outputs,
}

/// A recorded simulation; cheap to clone
#[derive(Debug, Clone)]
pub struct ReplaySimulation {
    outputs: Arc<Outputs>,
}

impl Simulation for ReplaySimulation {
    fn calculate(&self, variable: Variable, year: Year) -> Result<MicroSeries, EngineError> {
        self.outputs
            .get(&year)
            .and_then(|vars| vars.get(&variable))
            .cloned()
            .ok_or(EngineError::MissingVariable {
                variable: variable.name(),
                year,
            })
    }
}

/// Engine that answers from a recording instead of running rules
#[derive(Debug, Default)]
pub struct ReplayEngine {
    population: Vec<(Reform, Arc<Outputs>)>,
    households: Vec<(Situation, Reform, Arc<Outputs>)>,
}

impl ReplayEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self, EngineError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| EngineError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, EngineError> {
        let file: RecordingFile =
            serde_json::from_str(content).map_err(|e| EngineError::Parse(e.to_string()))?;

        let mut engine = Self::new();
        for record in file.population {
            engine.merge_population(record.reform, record.years);
        }
        for record in file.households {
            engine.merge_household(record.situation, record.reform, record.years);
        }

        tracing::debug!(
            population = engine.population.len(),
            households = engine.households.len(),
            "Loaded simulation recording"
        );
        Ok(engine)
    }

    /// Writes the recording back out in the format `from_json` reads
    pub fn write_json(&self, writer: impl Write) -> Result<(), EngineError> {
        let file = RecordingFile {
            population: self
                .population
                .iter()
                .map(|(reform, outputs)| PopulationRecord {
                    reform: reform.clone(),
                    years: (**outputs).clone(),
                })
                .collect(),
            households: self
                .households
                .iter()
                .map(|(situation, reform, outputs)| HouseholdRecord {
                    situation: situation.clone(),
                    reform: reform.clone(),
                    years: (**outputs).clone(),
                })
                .collect(),
        };
        serde_json::to_writer_pretty(writer, &file).map_err(|e| EngineError::Io(e.to_string()))
    }

    /// Records one population output
    pub fn record_population(
        &mut self,
        reform: &Reform,
        year: Year,
        variable: Variable,
        series: MicroSeries,
    ) -> &mut Self {
        let outputs = Outputs::from([(year, BTreeMap::from([(variable, series)]))]);
        self.merge_population(reform.clone(), outputs);
        self
    }

    /// Records one household output
    pub fn record_household(
        &mut self,
        situation: &Situation,
        reform: &Reform,
        year: Year,
        variable: Variable,
        series: MicroSeries,
    ) -> &mut Self {
        let outputs = Outputs::from([(year, BTreeMap::from([(variable, series)]))]);
        self.merge_household(situation.clone(), reform.clone(), outputs);
        self
    }

    fn merge_population(&mut self, reform: Reform, outputs: Outputs) {
        match self.population.iter_mut().find(|(r, _)| *r == reform) {
            Some((_, existing)) => merge_outputs(Arc::make_mut(existing), outputs),
            None => self.population.push((reform, Arc::new(outputs))),
        }
    }

    fn merge_household(&mut self, situation: Situation, reform: Reform, outputs: Outputs) {
        match self
            .households
            .iter_mut()
            .find(|(s, r, _)| *s == situation && *r == reform)
        {
            Some((_, _, existing)) => merge_outputs(Arc::make_mut(existing), outputs),
            None => self.households.push((situation, reform, Arc::new(outputs))),
        }
    }
}

fn merge_outputs(into: &mut Outputs, from: Outputs) {
    for (year, variables) in from {
        into.entry(year).or_default().extend(variables);
    }
}

fn describe_reform(reform: &Reform) -> String {
    if reform.is_baseline() {
        "the baseline".to_string()
    } else {
        format!("a reform of {} parameters", reform.len())
    }
}

impl SimulationEngine for ReplayEngine {
    type Sim = ReplaySimulation;

    fn household(&self, situation: &Situation, reform: &Reform) -> Result<Self::Sim, EngineError> {
        self.households
            .iter()
            .find(|(s, r, _)| s == situation && r == reform)
            .map(|(_, _, outputs)| ReplaySimulation {
                outputs: Arc::clone(outputs),
            })
            .ok_or_else(|| EngineError::MissingRecording {
                what: format!(
                    "household of {} people under {}",
                    situation.people.len(),
                    describe_reform(reform)
                ),
            })
    }

    fn population(&self, reform: &Reform) -> Result<Self::Sim, EngineError> {
        self.population
            .iter()
            .find(|(r, _)| r == reform)
            .map(|(_, outputs)| ReplaySimulation {
                outputs: Arc::clone(outputs),
            })
            .ok_or_else(|| EngineError::MissingRecording {
                what: format!("population under {}", describe_reform(reform)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reform::ReformBuilder;

    fn reform() -> Reform {
        ReformBuilder::new()
            .set("gov.hmrc.cgt.basic_rate", "2024-01-01.2100-12-31", 0.15)
            .build()
            .unwrap()
    }

    #[test]
    fn replays_population_by_reform() {
        let mut engine = ReplayEngine::new();
        engine
            .record_population(&Reform::baseline(), 2028, Variable::HouseholdNetIncome, MicroSeries::scalar(1.0))
            .record_population(&reform(), 2028, Variable::HouseholdNetIncome, MicroSeries::scalar(2.0))
            .record_population(&reform(), 2028, Variable::HouseholdTax, MicroSeries::scalar(3.0));

        let sim = engine.population(&reform()).unwrap();
        assert_eq!(sim.calculate(Variable::HouseholdNetIncome, 2028).unwrap().sum(), 2.0);
        assert_eq!(sim.calculate(Variable::HouseholdTax, 2028).unwrap().sum(), 3.0);
        assert!(matches!(
            sim.calculate(Variable::HouseholdTax, 2027),
            Err(EngineError::MissingVariable { year: 2027, .. })
        ));

        let baseline = engine.population(&Reform::baseline()).unwrap();
        assert_eq!(baseline.calculate(Variable::HouseholdNetIncome, 2028).unwrap().sum(), 1.0);
    }

    #[test]
    fn missing_recording_is_an_error() {
        let engine = ReplayEngine::new();
        let err = engine.population(&reform()).unwrap_err();
        assert!(matches!(err, EngineError::MissingRecording { .. }));
        assert!(engine.household(&Situation::new(), &Reform::baseline()).is_err());
    }

    #[test]
    fn recording_survives_json() {
        let mut situation = Situation::new();
        situation.set_person("you", "age", 2028, 30u8);

        let mut engine = ReplayEngine::new();
        engine.record_household(&situation, &reform(), 2028, Variable::IncomeTax, MicroSeries::scalar(1_200.0));

        let mut buffer = Vec::new();
        engine.write_json(&mut buffer).unwrap();
        let reloaded = ReplayEngine::from_reader(buffer.as_slice()).unwrap();

        let sim = reloaded.household(&situation, &reform()).unwrap();
        assert_eq!(sim.calculate(Variable::IncomeTax, 2028).unwrap().sum(), 1_200.0);
    }
}
