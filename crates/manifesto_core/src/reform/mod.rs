//! Policy reforms
//!
//! A reform is an immutable mapping from a dotted parameter path to a
//! dated schedule of override values. Its serde form is the engine's
//! nested dict:
//!
//! ```json
//! {
//!   "gov.hmrc.national_insurance.class_1.rates.employee.main": {
//!     "2025-01-01.2026-12-31": 0.07,
//!     "2027-01-01.2030-12-31": 0.06
//!   }
//! }
//! ```

mod builder;
mod path;
mod schedule;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use builder::ReformBuilder;
pub use path::ParameterPath;
pub use schedule::{ParameterValue, PeriodRange, Schedule};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reform {
    parameters: BTreeMap<ParameterPath, Schedule>,
}

impl Reform {
    /// The empty reform: simulating it reproduces the baseline
    pub fn baseline() -> Self {
        Self::default()
    }

    pub fn is_baseline(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Schedule> {
        let path = ParameterPath::parse(path).ok()?;
        self.parameters.get(&path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterPath, &Schedule)> {
        self.parameters.iter()
    }

    /// A copy of this reform keeping only the parameters accepted by `keep`
    pub fn retain(&self, mut keep: impl FnMut(&ParameterPath) -> bool) -> Self {
        Self {
            parameters: self
                .parameters
                .iter()
                .filter(|(path, _)| keep(*path))
                .map(|(path, schedule)| (path.clone(), schedule.clone()))
                .collect(),
        }
    }

    /// Drops the macro budget-incidence parameters, leaving only the
    /// direct tax-benefit changes.
    pub fn direct_only(&self) -> Self {
        self.retain(|path| !path.is_budget_incidence())
    }

    pub(crate) fn from_parameters(parameters: BTreeMap<ParameterPath, Schedule>) -> Self {
        Self { parameters }
    }
}
