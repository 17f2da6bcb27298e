//! Household form input and its mapping into a situation

use serde::{Deserialize, Serialize};

use super::Situation;
use crate::Year;
use crate::catalog::ImpactScope;
use crate::error::InputError;

pub const YOU: &str = "you";
pub const PARTNER: &str = "your partner";
pub const BENUNIT: &str = "your benefit unit";
pub const HOUSEHOLD: &str = "your household";

const MAX_AGE: u8 = 120;
const MAX_CHILDREN: usize = 10;
pub const FIRST_YEAR: Year = 2024;
pub const LAST_YEAR: Year = 2030;

/// Where a person's main income comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IncomeSource {
    None,
    #[default]
    Employment,
    #[serde(rename = "Self-employment")]
    SelfEmployment,
    Pension,
}

impl IncomeSource {
    /// Engine input variable that receives the income amount
    pub fn variable(&self) -> Option<&'static str> {
        match self {
            IncomeSource::None => None,
            IncomeSource::Employment => Some("employment_income"),
            IncomeSource::SelfEmployment => Some("self_employment_income"),
            IncomeSource::Pension => Some("pension_income"),
        }
    }
}

/// Housing tenure, named as the engine's `TenureType` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tenure {
    RentFromCouncil,
    #[serde(rename = "RENT_FROM_HA")]
    RentFromHousingAssociation,
    RentPrivately,
    OwnedOutright,
    OwnedWithMortgage,
}

impl Tenure {
    pub fn engine_name(&self) -> &'static str {
        match self {
            Tenure::RentFromCouncil => "RENT_FROM_COUNCIL",
            Tenure::RentFromHousingAssociation => "RENT_FROM_HA",
            Tenure::RentPrivately => "RENT_PRIVATELY",
            Tenure::OwnedOutright => "OWNED_OUTRIGHT",
            Tenure::OwnedWithMortgage => "OWNED_WITH_MORTGAGE",
        }
    }

    pub fn is_renting(&self) -> bool {
        matches!(
            self,
            Tenure::RentFromCouncil | Tenure::RentFromHousingAssociation | Tenure::RentPrivately
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildInput {
    #[serde(default = "default_child_age")]
    pub age: u8,
    #[serde(default)]
    pub attends_private_school: bool,
}

impl Default for ChildInput {
    fn default() -> Self {
        Self {
            age: default_child_age(),
            attends_private_school: false,
        }
    }
}

/// The household calculator form, in the shape the frontend posts it.
/// Optional fields are only read when the matching flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdInput {
    #[serde(default = "default_year")]
    pub year: Year,
    #[serde(default = "default_true")]
    pub include_indirect: bool,

    #[serde(default = "default_age")]
    pub age: u8,
    #[serde(default)]
    pub income_source: IncomeSource,
    #[serde(default = "default_income")]
    pub income: f64,
    #[serde(default)]
    pub has_capital_gains: bool,
    #[serde(default)]
    pub capital_gains: f64,

    #[serde(default)]
    pub has_partner: bool,
    #[serde(default)]
    pub partner_age: Option<u8>,
    #[serde(default)]
    pub partner_income_source: Option<IncomeSource>,
    #[serde(default)]
    pub partner_income: Option<f64>,

    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub children: Vec<ChildInput>,

    #[serde(default)]
    pub buying_first_home: bool,
    #[serde(default)]
    pub property_value: Option<f64>,

    #[serde(default)]
    pub is_renter: bool,
    #[serde(default)]
    pub is_private_renter: Option<bool>,
    #[serde(default)]
    pub rent: Option<f64>,
    /// Explicit tenure; overrides the renter flags when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<Tenure>,
}

fn default_year() -> Year {
    2028
}

fn default_true() -> bool {
    true
}

fn default_age() -> u8 {
    30
}

fn default_child_age() -> u8 {
    10
}

fn default_income() -> f64 {
    20_000.0
}

const DEFAULT_PROPERTY_VALUE: f64 = 200_000.0;
const DEFAULT_RENT: f64 = 20_000.0;

impl Default for HouseholdInput {
    fn default() -> Self {
        Self {
            year: default_year(),
            include_indirect: true,
            age: default_age(),
            income_source: IncomeSource::default(),
            income: default_income(),
            has_capital_gains: false,
            capital_gains: 0.0,
            has_partner: false,
            partner_age: None,
            partner_income_source: None,
            partner_income: None,
            has_children: false,
            children: Vec::new(),
            buying_first_home: false,
            property_value: None,
            is_renter: false,
            is_private_renter: None,
            rent: None,
            tenure: None,
        }
    }
}

impl HouseholdInput {
    pub fn scope(&self) -> ImpactScope {
        ImpactScope::from_include_indirect(self.include_indirect)
    }

    pub fn tenure(&self) -> Tenure {
        if let Some(tenure) = self.tenure {
            return tenure;
        }
        match (self.is_renter, self.is_private_renter.unwrap_or(false)) {
            (true, true) => Tenure::RentPrivately,
            (true, false) => Tenure::RentFromCouncil,
            (false, _) => Tenure::OwnedWithMortgage,
        }
    }

    fn children(&self) -> &[ChildInput] {
        if self.has_children { self.children.as_slice() } else { &[] }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        check_range("year", f64::from(self.year), FIRST_YEAR.into(), LAST_YEAR.into())?;
        check_range("age", self.age.into(), 0.0, MAX_AGE.into())?;
        check_amount("income", self.income)?;
        if self.has_capital_gains {
            check_amount("capitalGains", self.capital_gains)?;
        }
        if self.has_partner {
            if let Some(age) = self.partner_age {
                check_range("partnerAge", age.into(), 0.0, MAX_AGE.into())?;
            }
            if let Some(income) = self.partner_income {
                check_amount("partnerIncome", income)?;
            }
        }

        let children = self.children();
        if children.len() > MAX_CHILDREN {
            return Err(InputError::TooManyChildren {
                count: children.len(),
                max: MAX_CHILDREN,
            });
        }
        for child in children {
            check_range("children.age", child.age.into(), 0.0, MAX_AGE.into())?;
        }

        if self.buying_first_home {
            check_amount("propertyValue", self.property_value.unwrap_or(DEFAULT_PROPERTY_VALUE))?;
        }
        if self.tenure().is_renting() {
            check_amount("rent", self.rent.unwrap_or(DEFAULT_RENT))?;
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), InputError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), InputError> {
    check_range(field, value, 0.0, f64::MAX)
}

/// Maps validated form input into a situation for `input.year`
pub fn build_situation(input: &HouseholdInput) -> Result<Situation, InputError> {
    input.validate()?;

    let year = input.year;
    let mut situation = Situation::new();

    situation
        .set_person(YOU, "age", year, input.age)
        .set_person(YOU, "attends_private_school", year, false)
        .add_member(YOU, BENUNIT, HOUSEHOLD);
    if let Some(variable) = input.income_source.variable() {
        situation.set_person(YOU, variable, year, input.income);
    }
    if input.has_capital_gains {
        situation.set_person(YOU, "capital_gains", year, input.capital_gains);
    }

    if input.has_partner {
        situation
            .set_person(PARTNER, "age", year, input.partner_age.unwrap_or(default_age()))
            .set_person(PARTNER, "attends_private_school", year, false)
            .add_member(PARTNER, BENUNIT, HOUSEHOLD);
        let source = input.partner_income_source.unwrap_or(IncomeSource::None);
        if let Some(variable) = source.variable() {
            let income = input.partner_income.unwrap_or(default_income());
            situation.set_person(PARTNER, variable, year, income);
        }
    }

    for (i, child) in input.children().iter().enumerate() {
        let name = format!("child {}", i + 1);
        situation
            .set_person(&name, "age", year, child.age)
            .set_person(&name, "attends_private_school", year, child.attends_private_school)
            .add_member(&name, BENUNIT, HOUSEHOLD);
    }

    if input.buying_first_home {
        let value = input.property_value.unwrap_or(DEFAULT_PROPERTY_VALUE);
        situation
            .set_household(HOUSEHOLD, "main_residential_property_purchased", year, value)
            .set_household(
                HOUSEHOLD,
                "main_residential_property_purchased_is_first_home",
                year,
                true,
            );
    }

    let tenure = input.tenure();
    situation.set_household(HOUSEHOLD, "tenure_type", year, tenure.engine_name());
    if tenure.is_renting() {
        situation.set_household(HOUSEHOLD, "rent", year, input.rent.unwrap_or(DEFAULT_RENT));
    }

    Ok(situation)
}
