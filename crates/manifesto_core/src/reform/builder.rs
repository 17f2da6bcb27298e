//! Reform Builder
//!
//! Fluent construction of reforms from literal data, mirroring the way
//! manifesto costings are published (one dated range per line):
//!
//! ```ignore
//! let reform = ReformBuilder::new()
//!     .set("gov.hmrc.national_insurance.class_1.rates.employee.main", "2025-01-01.2026-12-31", 0.07)
//!     .set("gov.hmrc.national_insurance.class_1.rates.employee.main", "2027-01-01.2030-12-31", 0.06)
//!     .set("gov.contrib.conservatives.cb_hitc_household", "2026-01-01.2039-12-31", true)
//!     .build()?;
//! ```

use std::collections::BTreeMap;

use super::{ParameterPath, ParameterValue, PeriodRange, Reform, Schedule};
use crate::Year;
use crate::error::ReformError;

#[derive(Debug, Clone)]
struct PendingEntry {
    path: String,
    range: PendingRange,
    value: ParameterValue,
}

#[derive(Debug, Clone)]
enum PendingRange {
    Text(String),
    Years(Year, Year),
}

/// Builder for reforms; all validation is deferred to `build`
#[derive(Debug, Clone, Default)]
pub struct ReformBuilder {
    pending: Vec<PendingEntry>,
}

impl ReformBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override `path` over a `YYYY-MM-DD.YYYY-MM-DD` range
    #[must_use]
    pub fn set(
        mut self,
        path: impl Into<String>,
        range: impl Into<String>,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.pending.push(PendingEntry {
            path: path.into(),
            range: PendingRange::Text(range.into()),
            value: value.into(),
        });
        self
    }

    /// Override `path` from 1 January of `first` to 31 December of `last`
    #[must_use]
    pub fn set_years(
        mut self,
        path: impl Into<String>,
        first: Year,
        last: Year,
        value: impl Into<ParameterValue>,
    ) -> Self {
        self.pending.push(PendingEntry {
            path: path.into(),
            range: PendingRange::Years(first, last),
            value: value.into(),
        });
        self
    }

    pub fn build(self) -> Result<Reform, ReformError> {
        let mut grouped: BTreeMap<ParameterPath, Vec<(PeriodRange, ParameterValue)>> =
            BTreeMap::new();

        for entry in self.pending {
            let path = ParameterPath::parse(&entry.path)?;
            let range = match entry.range {
                PendingRange::Text(text) => text.parse()?,
                PendingRange::Years(first, last) => PeriodRange::years(first, last)?,
            };
            grouped.entry(path).or_default().push((range, entry.value));
        }

        let parameters = grouped
            .into_iter()
            .map(|(path, entries)| Ok((path, Schedule::new(entries)?)))
            .collect::<Result<BTreeMap<_, _>, ReformError>>()?;

        Ok(Reform::from_parameters(parameters))
    }
}
