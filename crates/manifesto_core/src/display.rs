//! Number formatting and chart headlines

use std::fmt;

use crate::aggregate::HouseholdImpact;
use crate::catalog::Party;
use crate::snapshot::ManifestoImpactRow;

fn sign(value: f64) -> &'static str {
    if value >= 0.0 { "+" } else { "" }
}

/// Pounds as signed billions: `+1.2bn`
pub fn format_bn(pounds: f64) -> String {
    let bn = pounds / 1e9;
    format!("{}{bn:.1}bn", sign(bn))
}

/// A percentage: `+0.3%`
pub fn format_pct(value: f64) -> String {
    format!("{}{value:.1}%", sign(value))
}

/// Whole pounds with thousands separators: `+£1,234`, `-£56`
pub fn format_gbp(value: f64) -> String {
    let rounded = value.abs().round();
    let digits = format!("{rounded:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "+" };
    format!("{sign}£{grouped}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Absolute pounds, shown in billions
    Billions,
    /// Relative change in percent
    Percent,
}

/// Columns of the manifesto impact table that can be charted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocietalMetric {
    Cost,
    Benefits,
    Taxes,
    Poverty,
    ChildPoverty,
    AdultPoverty,
    SeniorPoverty,
    Gini,
}

impl SocietalMetric {
    pub const ALL: [SocietalMetric; 8] = [
        SocietalMetric::Cost,
        SocietalMetric::Benefits,
        SocietalMetric::Taxes,
        SocietalMetric::Poverty,
        SocietalMetric::ChildPoverty,
        SocietalMetric::AdultPoverty,
        SocietalMetric::SeniorPoverty,
        SocietalMetric::Gini,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SocietalMetric::Cost => "Cost",
            SocietalMetric::Benefits => "Benefits",
            SocietalMetric::Taxes => "Taxes",
            SocietalMetric::Poverty => "Poverty",
            SocietalMetric::ChildPoverty => "Child poverty",
            SocietalMetric::AdultPoverty => "Adult poverty",
            SocietalMetric::SeniorPoverty => "Senior poverty",
            SocietalMetric::Gini => "Gini index",
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            SocietalMetric::Cost | SocietalMetric::Benefits | SocietalMetric::Taxes => {
                Unit::Billions
            }
            _ => Unit::Percent,
        }
    }

    pub fn value(&self, row: &ManifestoImpactRow) -> f64 {
        match self {
            SocietalMetric::Cost => row.cost,
            SocietalMetric::Benefits => row.benefits,
            SocietalMetric::Taxes => row.taxes,
            SocietalMetric::Poverty => row.poverty_impact,
            SocietalMetric::ChildPoverty => row.child_poverty_impact,
            SocietalMetric::AdultPoverty => row.adult_poverty_impact,
            SocietalMetric::SeniorPoverty => row.senior_poverty_impact,
            SocietalMetric::Gini => row.gini_index_impact,
        }
    }

    /// Whether the smallest value is the best outcome. A higher cost means
    /// a larger cut in the deficit.
    pub fn lower_is_better(&self) -> bool {
        !matches!(self, SocietalMetric::Benefits | SocietalMetric::Cost)
    }

    pub fn format(&self, value: f64) -> String {
        match self.unit() {
            Unit::Billions => format_bn(value),
            Unit::Percent => format_pct(value),
        }
    }
}

impl fmt::Display for SocietalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The best-placed party for a metric and the sentence announcing it
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub party: Party,
    pub value: f64,
    pub text: String,
}

/// Picks the party with the best outcome on `metric` among `rows`
/// (normally one year and scope); ties go to the earlier row
pub fn largest_impact(metric: SocietalMetric, rows: &[ManifestoImpactRow]) -> Option<Headline> {
    let best = rows.iter().reduce(|best, row| {
        let (a, b) = (metric.value(best), metric.value(row));
        let better = if metric.lower_is_better() { b < a } else { b > a };
        if better { row } else { best }
    })?;

    let value = metric.value(best);
    let party = best.manifesto.manifesto_name();
    let label = metric.label().to_lowercase();
    let text = match metric {
        SocietalMetric::Cost => format!("The {party} would reduce the deficit the most"),
        SocietalMetric::Taxes => format!("The {party} would reduce taxes the most"),
        SocietalMetric::Benefits => format!("The {party} would increase benefits the most"),
        _ if value < 0.0 => format!("The {party} would decrease {label} the most"),
        _ => format!("The {party} would increase {label} the least"),
    };

    Some(Headline {
        party: best.manifesto,
        value,
        text,
    })
}

/// The party whose reform raises `metric` the most for this household
pub fn best_household_party(impacts: &[HouseholdImpact], metric: &str) -> Option<Party> {
    impacts
        .iter()
        .filter_map(|impact| impact.value(metric).map(|v| (impact.party, v)))
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map(|(party, _)| party)
}
