//! Simulation engine boundary
//!
//! The tax-benefit rules live in an external microsimulation engine. This
//! module only describes what the rest of the crate needs from it: build a
//! simulation for a household situation or for the whole population under a
//! reform, then ask for a variable in a given year as a weighted series.

mod replay;
mod series;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Year;
use crate::error::EngineError;
use crate::reform::Reform;
use crate::situation::Situation;

pub use replay::{ReplayEngine, ReplaySimulation};
pub use series::MicroSeries;

/// Engine variables read by the aggregators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "household_net_income")]
    HouseholdNetIncome,
    #[serde(rename = "household_benefits")]
    HouseholdBenefits,
    #[serde(rename = "household_tax")]
    HouseholdTax,
    #[serde(rename = "CB_HITC")]
    ChildBenefitCharge,
    #[serde(rename = "income_tax")]
    IncomeTax,
    #[serde(rename = "national_insurance")]
    NationalInsurance,
    #[serde(rename = "expected_sdlt")]
    StampDuty,
    #[serde(rename = "private_school_vat")]
    PrivateSchoolVat,
    #[serde(rename = "capital_gains_tax")]
    CapitalGainsTax,
    #[serde(rename = "universal_credit")]
    UniversalCredit,
    #[serde(rename = "in_poverty")]
    InPoverty,
    #[serde(rename = "is_child")]
    IsChild,
    #[serde(rename = "is_WA_adult")]
    IsWorkingAgeAdult,
    #[serde(rename = "age_over_64")]
    AgeOver64,
    #[serde(rename = "equiv_household_net_income")]
    EquivHouseholdNetIncome,
    #[serde(rename = "household_count_people")]
    HouseholdCountPeople,
    #[serde(rename = "household_income_decile")]
    HouseholdIncomeDecile,
}

impl Variable {
    pub const ALL: [Variable; 17] = [
        Variable::HouseholdNetIncome,
        Variable::HouseholdBenefits,
        Variable::HouseholdTax,
        Variable::ChildBenefitCharge,
        Variable::IncomeTax,
        Variable::NationalInsurance,
        Variable::StampDuty,
        Variable::PrivateSchoolVat,
        Variable::CapitalGainsTax,
        Variable::UniversalCredit,
        Variable::InPoverty,
        Variable::IsChild,
        Variable::IsWorkingAgeAdult,
        Variable::AgeOver64,
        Variable::EquivHouseholdNetIncome,
        Variable::HouseholdCountPeople,
        Variable::HouseholdIncomeDecile,
    ];

    /// Name of the variable inside the engine
    pub fn name(&self) -> &'static str {
        match self {
            Variable::HouseholdNetIncome => "household_net_income",
            Variable::HouseholdBenefits => "household_benefits",
            Variable::HouseholdTax => "household_tax",
            Variable::ChildBenefitCharge => "CB_HITC",
            Variable::IncomeTax => "income_tax",
            Variable::NationalInsurance => "national_insurance",
            Variable::StampDuty => "expected_sdlt",
            Variable::PrivateSchoolVat => "private_school_vat",
            Variable::CapitalGainsTax => "capital_gains_tax",
            Variable::UniversalCredit => "universal_credit",
            Variable::InPoverty => "in_poverty",
            Variable::IsChild => "is_child",
            Variable::IsWorkingAgeAdult => "is_WA_adult",
            Variable::AgeOver64 => "age_over_64",
            Variable::EquivHouseholdNetIncome => "equiv_household_net_income",
            Variable::HouseholdCountPeople => "household_count_people",
            Variable::HouseholdIncomeDecile => "household_income_decile",
        }
    }

    pub fn from_name(name: &str) -> Option<Variable> {
        Variable::ALL.into_iter().find(|v| v.name() == name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A built simulation that can be queried for variables
pub trait Simulation {
    fn calculate(&self, variable: Variable, year: Year) -> Result<MicroSeries, EngineError>;
}

/// Factory for simulations. `Reform::baseline()` yields the baseline.
pub trait SimulationEngine {
    type Sim: Simulation + Send;

    /// Simulation of a single household situation
    fn household(&self, situation: &Situation, reform: &Reform) -> Result<Self::Sim, EngineError>;

    /// Simulation of the representative population dataset
    fn population(&self, reform: &Reform) -> Result<Self::Sim, EngineError>;
}

impl<S: Simulation + ?Sized> Simulation for &S {
    fn calculate(&self, variable: Variable, year: Year) -> Result<MicroSeries, EngineError> {
        (**self).calculate(variable, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for variable in Variable::ALL {
            assert_eq!(Variable::from_name(variable.name()), Some(variable));
            let json = serde_json::to_string(&variable).unwrap();
            assert_eq!(json, format!("\"{}\"", variable.name()));
        }
    }
}
