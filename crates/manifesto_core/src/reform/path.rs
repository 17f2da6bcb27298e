//! Dotted policy parameter paths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReformError;

/// Prefix shared by every macro budget-incidence parameter
const BUDGET_INCIDENCE_PREFIX: &str = "gov.contrib.policyengine.budget.";

/// A dotted path into the engine's parameter tree, e.g.
/// `gov.hmrc.stamp_duty.residential.purchase.main.first.rate[1].rate`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParameterPath(String);

impl ParameterPath {
    pub fn parse(path: &str) -> Result<Self, ReformError> {
        let invalid = |reason| ReformError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        if path.is_empty() {
            return Err(invalid("path is empty"));
        }

        for segment in path.split('.') {
            let name = match segment.split_once('[') {
                Some((name, index)) => {
                    let digits = index
                        .strip_suffix(']')
                        .ok_or_else(|| invalid("unterminated index"))?;
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(invalid("index must be a non-negative integer"));
                    }
                    name
                }
                None => segment,
            };

            if name.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
                return Err(invalid("segments may only contain letters, digits and '_'"));
            }
        }

        Ok(Self(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Macro budget-incidence parameters model indirect effects (spending
    /// and tax incidence assumptions) rather than direct tax-benefit rules.
    pub fn is_budget_incidence(&self) -> bool {
        self.0.starts_with(BUDGET_INCIDENCE_PREFIX)
    }
}

impl fmt::Display for ParameterPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ParameterPath {
    type Err = ReformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ParameterPath {
    type Error = ReformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ParameterPath> for String {
    fn from(path: ParameterPath) -> Self {
        path.0
    }
}
