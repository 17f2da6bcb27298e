//! Household situations
//!
//! A situation describes one synthetic household in the engine's nested
//! shape. Every attribute is a mapping from calculation period to value,
//! and member lists name people shared across benefit units and households:
//!
//! ```json
//! {
//!   "people": { "you": { "age": { "2028": 30 } } },
//!   "benunits": { "your benefit unit": { "members": ["you"] } },
//!   "households": { "your household": { "members": ["you"], "tenure_type": { "2028": "RENT_PRIVATELY" } } }
//! }
//! ```

mod input;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Year;

pub use input::{
    ChildInput, FIRST_YEAR, HouseholdInput, IncomeSource, LAST_YEAR, Tenure, build_situation,
};

/// A single attribute value for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Period (`"2028"`, as the engine writes it) -> value
pub type PeriodValues = BTreeMap<String, Value>;

/// Variable name -> per-period values
pub type Attributes = BTreeMap<String, PeriodValues>;

/// A benefit unit or household: a member list plus group-level attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub members: Vec<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub people: BTreeMap<String, Attributes>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub benunits: BTreeMap<String, Group>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub households: BTreeMap<String, Group>,
}

impl Situation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or extends) a person and records one attribute value
    pub fn set_person(
        &mut self,
        person: &str,
        variable: &str,
        year: Year,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.people
            .entry(person.to_string())
            .or_default()
            .entry(variable.to_string())
            .or_default()
            .insert(year.to_string(), value.into());
        self
    }

    pub fn set_household(
        &mut self,
        household: &str,
        variable: &str,
        year: Year,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.households
            .entry(household.to_string())
            .or_default()
            .attributes
            .entry(variable.to_string())
            .or_default()
            .insert(year.to_string(), value.into());
        self
    }

    /// Appends `person` to the member lists of `benunit` and `household`,
    /// creating either group if needed
    pub fn add_member(&mut self, person: &str, benunit: &str, household: &str) -> &mut Self {
        for group in [
            self.benunits.entry(benunit.to_string()).or_default(),
            self.households.entry(household.to_string()).or_default(),
        ] {
            if !group.members.iter().any(|m| m == person) {
                group.members.push(person.to_string());
            }
        }
        self
    }

    /// The value of a person-level attribute for `year`
    pub fn person_value(&self, person: &str, variable: &str, year: Year) -> Option<&Value> {
        self.people.get(person)?.get(variable)?.get(&year.to_string())
    }

    /// The value of a household-level attribute for `year`
    pub fn household_value(&self, household: &str, variable: &str, year: Year) -> Option<&Value> {
        self.households
            .get(household)?
            .attributes
            .get(variable)?
            .get(&year.to_string())
    }

    /// People who are not listed as a member of any household
    #[cfg(test)]
    pub(crate) fn unhoused_people(&self) -> Vec<&str> {
        self.people
            .keys()
            .filter(|name| {
                !self
                    .households
                    .values()
                    .any(|h| h.members.iter().any(|m| m == *name))
            })
            .map(String::as_str)
            .collect()
    }
}
