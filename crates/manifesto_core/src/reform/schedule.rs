//! Dated value schedules for a single parameter

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::Year;
use crate::error::ReformError;

/// An inclusive date range written `YYYY-MM-DD.YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodRange {
    pub start: Date,
    pub end: Date,
}

impl PeriodRange {
    pub fn new(start: Date, end: Date) -> Result<Self, ReformError> {
        if start > end {
            return Err(ReformError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// 1 January of `first` through 31 December of `last`
    pub fn years(first: Year, last: Year) -> Result<Self, ReformError> {
        let bad_year = |_| ReformError::InvalidRange(format!("{first}..{last}"));
        let start = Date::new(first, 1, 1).map_err(bad_year)?;
        let end = Date::new(last, 12, 31).map_err(bad_year)?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    fn overlaps(&self, other: &PeriodRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for PeriodRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.start, self.end)
    }
}

impl FromStr for PeriodRange {
    type Err = ReformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReformError::InvalidRange(s.to_string());
        let (start, end) = s.split_once('.').ok_or_else(invalid)?;
        let start: Date = start.parse().map_err(|_| invalid())?;
        let end: Date = end.parse().map_err(|_| invalid())?;
        Self::new(start, end)
    }
}

/// A single override value. Numbers may be infinite (uncapped thresholds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum ParameterValue {
    Bool(bool),
    Number(f64),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(b) => write!(f, "{b}"),
            ParameterValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            ParameterValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

/// Wire form: JSON has no infinity literal, so infinite numbers travel as text
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl TryFrom<RawValue> for ParameterValue {
    type Error = ReformError;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Bool(b) => Ok(ParameterValue::Bool(b)),
            RawValue::Number(n) => Ok(ParameterValue::Number(n)),
            RawValue::Text(text) => match text.as_str() {
                "Infinity" | "inf" | ".inf" => Ok(ParameterValue::Number(f64::INFINITY)),
                "-Infinity" | "-inf" | "-.inf" => Ok(ParameterValue::Number(f64::NEG_INFINITY)),
                _ => Err(ReformError::InvalidValue(text)),
            },
        }
    }
}

impl From<ParameterValue> for RawValue {
    fn from(value: ParameterValue) -> Self {
        match value {
            ParameterValue::Bool(b) => RawValue::Bool(b),
            ParameterValue::Number(n) if n.is_infinite() => RawValue::Text(value.to_string()),
            ParameterValue::Number(n) => RawValue::Number(n),
        }
    }
}

/// Piecewise schedule of values over non-overlapping date ranges, kept
/// sorted by start date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, ParameterValue>",
    into = "BTreeMap<String, ParameterValue>"
)]
pub struct Schedule {
    entries: Vec<(PeriodRange, ParameterValue)>,
}

impl Schedule {
    pub fn new(mut entries: Vec<(PeriodRange, ParameterValue)>) -> Result<Self, ReformError> {
        entries.sort_by_key(|(range, _)| *range);

        for pair in entries.windows(2) {
            let (first, second) = (&pair[0].0, &pair[1].0);
            if first.overlaps(second) {
                return Err(ReformError::OverlappingRanges {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(PeriodRange, ParameterValue)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value in force on `date`, if any range covers it
    pub fn value_at(&self, date: Date) -> Option<ParameterValue> {
        self.entries
            .iter()
            .find(|(range, _)| range.contains(date))
            .map(|(_, value)| *value)
    }

    /// The value in force on 1 January of `year`
    pub fn value_in_year(&self, year: Year) -> Option<ParameterValue> {
        Date::new(year, 1, 1).ok().and_then(|d| self.value_at(d))
    }
}

impl TryFrom<BTreeMap<String, ParameterValue>> for Schedule {
    type Error = ReformError;

    fn try_from(map: BTreeMap<String, ParameterValue>) -> Result<Self, Self::Error> {
        let entries = map
            .into_iter()
            .map(|(range, value)| Ok((range.parse()?, value)))
            .collect::<Result<Vec<_>, ReformError>>()?;
        Self::new(entries)
    }
}

impl From<Schedule> for BTreeMap<String, ParameterValue> {
    fn from(schedule: Schedule) -> Self {
        schedule
            .entries
            .into_iter()
            .map(|(range, value)| (range.to_string(), value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> PeriodRange {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_ranges() {
        let r = range("2025-01-01.2026-12-31");
        assert_eq!(r.start, jiff::civil::date(2025, 1, 1));
        assert_eq!(r.to_string(), "2025-01-01.2026-12-31");
        assert_eq!(PeriodRange::years(2025, 2026).unwrap(), r);
    }

    #[test]
    fn rejects_bad_ranges() {
        assert!("2025-01-01".parse::<PeriodRange>().is_err());
        assert!("2025-13-01.2025-12-31".parse::<PeriodRange>().is_err());
        assert!(matches!(
            "2026-01-01.2025-12-31".parse::<PeriodRange>(),
            Err(ReformError::InvertedRange { .. })
        ));
    }

    #[test]
    fn looks_up_values_by_date() {
        let schedule = Schedule::new(vec![
            (range("2027-01-01.2030-12-31"), 0.06.into()),
            (range("2025-01-01.2026-12-31"), 0.07.into()),
        ])
        .unwrap();

        assert_eq!(schedule.value_in_year(2024), None);
        assert_eq!(schedule.value_in_year(2026), Some(ParameterValue::Number(0.07)));
        assert_eq!(schedule.value_in_year(2028), Some(ParameterValue::Number(0.06)));
        assert_eq!(schedule.entries()[0].0, range("2025-01-01.2026-12-31"));
    }

    #[test]
    fn rejects_overlaps() {
        let err = Schedule::new(vec![
            (range("2025-01-01.2026-12-31"), 1.0.into()),
            (range("2026-06-01.2027-12-31"), 2.0.into()),
        ])
        .unwrap_err();
        assert!(matches!(err, ReformError::OverlappingRanges { .. }));
    }

    #[test]
    fn infinity_survives_json() {
        let schedule = Schedule::new(vec![(
            range("2025-01-01.2039-12-31"),
            f64::INFINITY.into(),
        )])
        .unwrap();

        let json = serde_json::to_string(&schedule).unwrap();
        assert_eq!(json, r#"{"2025-01-01.2039-12-31":"Infinity"}"#);

        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value_in_year(2030), Some(ParameterValue::Number(f64::INFINITY)));
    }
}
