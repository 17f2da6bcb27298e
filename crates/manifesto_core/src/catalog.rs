//! Manifesto reform catalog
//!
//! One full reform per party, plus a direct-only variant that leaves out
//! the macro budget-incidence parameters (`gov.contrib.policyengine.budget.*`).
//! The catalog is built once from literal data and handed around by reference.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReformError;
use crate::reform::{Reform, ReformBuilder};

/// Parties whose manifestos are compared, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Party {
    #[serde(rename = "Conservatives")]
    Conservatives,
    #[serde(rename = "Labour")]
    Labour,
    #[serde(rename = "Liberal Democrats")]
    LiberalDemocrats,
}

impl Party {
    pub const ALL: [Party; 3] = [Party::Conservatives, Party::Labour, Party::LiberalDemocrats];

    pub fn name(&self) -> &'static str {
        match self {
            Party::Conservatives => "Conservatives",
            Party::Labour => "Labour",
            Party::LiberalDemocrats => "Liberal Democrats",
        }
    }

    pub fn from_name(name: &str) -> Option<Party> {
        Party::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Name written to snapshot files and shown in chart headlines
    pub fn manifesto_name(&self) -> &'static str {
        match self {
            Party::Labour => "Labour Party",
            other => other.name(),
        }
    }

    /// Accepts either the snapshot name or the short name
    pub fn from_manifesto_name(name: &str) -> Option<Party> {
        Party::ALL
            .into_iter()
            .find(|p| p.manifesto_name() == name || p.name() == name)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether indirect (budget-incidence) effects are included
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactScope {
    Direct,
    DirectAndIndirect,
}

impl ImpactScope {
    pub const ALL: [ImpactScope; 2] = [ImpactScope::DirectAndIndirect, ImpactScope::Direct];

    pub fn from_include_indirect(include_indirect: bool) -> Self {
        if include_indirect {
            ImpactScope::DirectAndIndirect
        } else {
            ImpactScope::Direct
        }
    }

    pub fn includes_indirect(&self) -> bool {
        matches!(self, ImpactScope::DirectAndIndirect)
    }
}

impl fmt::Display for ImpactScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpactScope::Direct => f.write_str("direct"),
            ImpactScope::DirectAndIndirect => f.write_str("direct + indirect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PartyReforms {
    full: Reform,
    direct: Reform,
}

impl PartyReforms {
    fn new(full: Reform) -> Self {
        let direct = full.direct_only();
        Self { full, direct }
    }
}

/// Every party's reform in both scopes
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    conservatives: PartyReforms,
    labour: PartyReforms,
    liberal_democrats: PartyReforms,
}

impl Catalog {
    pub fn load() -> Result<Self, ReformError> {
        Ok(Self {
            conservatives: PartyReforms::new(conservatives()?),
            labour: PartyReforms::new(labour()?),
            liberal_democrats: PartyReforms::new(liberal_democrats()?),
        })
    }

    pub fn reform(&self, party: Party, scope: ImpactScope) -> &Reform {
        let reforms = match party {
            Party::Conservatives => &self.conservatives,
            Party::Labour => &self.labour,
            Party::LiberalDemocrats => &self.liberal_democrats,
        };
        match scope {
            ImpactScope::Direct => &reforms.direct,
            ImpactScope::DirectAndIndirect => &reforms.full,
        }
    }

    /// All parties in display order for one scope
    pub fn all(&self, scope: ImpactScope) -> impl Iterator<Item = (Party, &Reform)> + '_ {
        Party::ALL
            .into_iter()
            .map(move |party| (party, self.reform(party, scope)))
    }
}

// ============================================================================
// Manifesto literals
// ============================================================================

fn conservatives() -> Result<Reform, ReformError> {
    ReformBuilder::new()
        .set("gov.contrib.conservatives.cb_hitc_household", "2026-01-01.2039-12-31", true)
        .set("gov.contrib.conservatives.pensioner_personal_allowance", "2025-01-01.2025-12-31", 13_040.0)
        .set("gov.contrib.conservatives.pensioner_personal_allowance", "2026-01-01.2026-12-31", 13_370.0)
        .set("gov.contrib.conservatives.pensioner_personal_allowance", "2027-01-01.2027-12-31", 13_710.0)
        .set("gov.contrib.conservatives.pensioner_personal_allowance", "2028-01-01.2028-12-31", 14_060.0)
        .set("gov.contrib.conservatives.pensioner_personal_allowance", "2029-01-01.2030-12-31", 14_450.0)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", "2025-01-01.2025-12-31", 1.98)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", "2026-01-01.2026-12-31", 2.98)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", "2027-01-01.2027-12-31", 4.0)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", "2028-01-01.2028-12-31", 5.0)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", "2029-01-01.2030-12-31", 6.0)
        .set("gov.contrib.policyengine.budget.education", "2025-01-01.2027-12-31", 0.3)
        .set("gov.contrib.policyengine.budget.education", "2028-01-01.2028-12-31", 0.5)
        .set("gov.contrib.policyengine.budget.education", "2029-01-01.2029-12-31", 1.0)
        .set("gov.contrib.policyengine.budget.nhs", "2025-01-01.2025-12-31", 0.274)
        .set("gov.contrib.policyengine.budget.nhs", "2026-01-01.2026-12-31", 0.281)
        .set("gov.contrib.policyengine.budget.nhs", "2027-01-01.2027-12-31", 0.535)
        .set("gov.contrib.policyengine.budget.nhs", "2028-01-01.2028-12-31", 0.588)
        .set("gov.contrib.policyengine.budget.nhs", "2029-01-01.2029-12-31", 0.609)
        .set("gov.contrib.policyengine.budget.other_public_spending", "2025-01-01.2025-12-31", -3.745)
        .set("gov.contrib.policyengine.budget.other_public_spending", "2026-01-01.2026-12-31", -7.945)
        .set("gov.contrib.policyengine.budget.other_public_spending", "2027-01-01.2027-12-31", -11.35)
        .set("gov.contrib.policyengine.budget.other_public_spending", "2028-01-01.2028-12-31", -12.474)
        .set("gov.contrib.policyengine.budget.other_public_spending", "2029-01-01.2029-12-31", -13.104)
        .set("gov.hmrc.income_tax.charges.CB_HITC.phase_out_end", "2026-01-01.2039-12-31", 160_000.0)
        .set("gov.hmrc.income_tax.charges.CB_HITC.phase_out_start", "2026-01-01.2039-12-31", 120_000.0)
        .set("gov.hmrc.national_insurance.class_1.rates.employee.main", "2025-01-01.2026-12-31", 0.07)
        .set("gov.hmrc.national_insurance.class_1.rates.employee.main", "2027-01-01.2030-12-31", 0.06)
        .set("gov.hmrc.national_insurance.class_4.rates.main", "2025-01-01.2025-12-31", 0.05)
        .set("gov.hmrc.national_insurance.class_4.rates.main", "2026-01-01.2026-12-31", 0.04)
        .set("gov.hmrc.national_insurance.class_4.rates.main", "2027-01-01.2027-12-31", 0.03)
        .set("gov.hmrc.national_insurance.class_4.rates.main", "2028-01-01.2028-12-31", 0.02)
        .set("gov.hmrc.national_insurance.class_4.rates.main", "2029-01-01.2030-12-31", 0.0)
        .set("gov.hmrc.stamp_duty.residential.purchase.main.first.max", "2025-01-01.2039-12-31", f64::INFINITY)
        .set("gov.hmrc.stamp_duty.residential.purchase.main.first.rate[1].rate", "2025-01-01.2039-12-31", 0.0)
        .build()
}

fn labour() -> Result<Reform, ReformError> {
    ReformBuilder::new()
        .set("gov.contrib.labour.private_school_vat", "2025-01-01.2039-12-31", 0.2)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", "2024-01-01.2100-12-31", 2.6)
        .set("gov.contrib.policyengine.budget.education", "2024-01-01.2100-12-31", 1.3)
        .set("gov.contrib.policyengine.budget.high_income_incident_tax_change", "2024-01-01.2100-12-31", 3.2)
        .set("gov.contrib.policyengine.budget.nhs", "2024-01-01.2100-12-31", 2.0)
        .set("gov.contrib.policyengine.budget.other_public_spending", "2024-01-01.2100-12-31", 0.9)
        .build()
}

fn liberal_democrats() -> Result<Reform, ReformError> {
    const ALWAYS: &str = "2024-01-01.2100-12-31";

    ReformBuilder::new()
        .set("gov.contrib.policyengine.budget.consumer_incident_tax_change", ALWAYS, 3.64)
        .set("gov.contrib.policyengine.budget.corporate_incident_tax_change", ALWAYS, 17.66)
        .set("gov.contrib.policyengine.budget.education", ALWAYS, 6.63)
        .set("gov.contrib.policyengine.budget.nhs", ALWAYS, 8.35)
        .set("gov.contrib.policyengine.budget.other_public_spending", ALWAYS, 6.31)
        .set("gov.dwp.benefit_cap.non_single.in_london", ALWAYS, 100_000.0)
        .set("gov.dwp.benefit_cap.non_single.outside_london", ALWAYS, 100_000.0)
        .set("gov.dwp.benefit_cap.single.in_london", ALWAYS, 100_000.0)
        .set("gov.dwp.benefit_cap.single.outside_london", ALWAYS, 100_000.0)
        .set("gov.dwp.carers_allowance.rate", ALWAYS, 101.9)
        .set("gov.dwp.universal_credit.elements.child.limit.child_count", ALWAYS, 99.0)
        .set("gov.hmrc.cgt.additional_rate", ALWAYS, 0.25)
        .set("gov.hmrc.cgt.annual_exempt_amount", ALWAYS, 5_000.0)
        .set("gov.hmrc.cgt.basic_rate", ALWAYS, 0.15)
        .set("gov.hmrc.cgt.higher_rate", ALWAYS, 0.25)
        .build()
}
