//! Weighted series returned by the engine

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Values with survey weights, one entry per entity record.
/// Household simulations carry unit weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct MicroSeries {
    values: Vec<f64>,
    weights: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSeries {
    values: Vec<f64>,
    #[serde(default)]
    weights: Option<Vec<f64>>,
}

impl TryFrom<RawSeries> for MicroSeries {
    type Error = EngineError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        match raw.weights {
            Some(weights) => MicroSeries::new(raw.values, weights),
            None => Ok(MicroSeries::unweighted(raw.values)),
        }
    }
}

fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<(), EngineError> {
    if expected == actual {
        Ok(())
    } else {
        Err(EngineError::LengthMismatch {
            context,
            expected,
            actual,
        })
    }
}

impl MicroSeries {
    pub fn new(values: Vec<f64>, weights: Vec<f64>) -> Result<Self, EngineError> {
        check_len("series weights", values.len(), weights.len())?;
        Ok(Self { values, weights })
    }

    pub fn unweighted(values: Vec<f64>) -> Self {
        let weights = vec![1.0; values.len()];
        Self { values, weights }
    }

    pub fn scalar(value: f64) -> Self {
        Self::unweighted(vec![value])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Weighted total
    pub fn sum(&self) -> f64 {
        self.values
            .iter()
            .zip(&self.weights)
            .map(|(v, w)| v * w)
            .sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weighted mean; zero for an empty or zero-weight series
    pub fn mean(&self) -> f64 {
        let total_weight = self.total_weight();
        if total_weight == 0.0 {
            0.0
        } else {
            self.sum() / total_weight
        }
    }

    /// Weighted Gini coefficient from the area under the Lorenz curve
    pub fn gini(&self) -> f64 {
        let mut pairs: Vec<(f64, f64)> = self
            .values
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
            .filter(|(_, w)| *w > 0.0)
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total_weight: f64 = pairs.iter().map(|(_, w)| w).sum();
        let total: f64 = pairs.iter().map(|(v, w)| v * w).sum();
        if total_weight == 0.0 || total == 0.0 {
            return 0.0;
        }

        let mut cumulative = 0.0;
        let mut area = 0.0;
        for (value, weight) in pairs {
            let previous = cumulative;
            cumulative += value * weight;
            area += weight * (previous + cumulative) / 2.0;
        }

        1.0 - 2.0 * area / (total_weight * total)
    }

    /// Keeps the entries whose `mask` value is non-zero
    pub fn filter(&self, mask: &MicroSeries) -> Result<MicroSeries, EngineError> {
        check_len("series mask", self.len(), mask.len())?;
        let (values, weights) = self
            .values
            .iter()
            .zip(&self.weights)
            .zip(&mask.values)
            .filter(|(_, m)| **m != 0.0)
            .map(|((v, w), _)| (*v, *w))
            .unzip();
        Ok(Self { values, weights })
    }

    /// Multiplies each weight by the matching value of `factors`
    pub fn scale_weights(&self, factors: &MicroSeries) -> Result<MicroSeries, EngineError> {
        check_len("weight factors", self.len(), factors.len())?;
        let weights = self
            .weights
            .iter()
            .zip(&factors.values)
            .map(|(w, f)| w * f)
            .collect();
        Ok(Self {
            values: self.values.clone(),
            weights,
        })
    }

    /// Element-wise `self - other`, keeping this series' weights
    pub fn difference(&self, other: &MicroSeries) -> Result<MicroSeries, EngineError> {
        check_len("series difference", self.len(), other.len())?;
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            values,
            weights: self.weights.clone(),
        })
    }

    pub fn clip(&self, min: f64, max: f64) -> MicroSeries {
        Self {
            values: self.values.iter().map(|v| v.clamp(min, max)).collect(),
            weights: self.weights.clone(),
        }
    }

    /// Weighted sums grouped by the (integer-rounded) value of `keys`,
    /// sorted by key
    pub fn group_sum(&self, keys: &MicroSeries) -> Result<Vec<(i64, f64)>, EngineError> {
        check_len("group keys", self.len(), keys.len())?;
        let mut groups: FxHashMap<i64, f64> = FxHashMap::default();
        for ((value, weight), key) in self.values.iter().zip(&self.weights).zip(&keys.values) {
            *groups.entry(key.round() as i64).or_insert(0.0) += value * weight;
        }
        let mut sorted: Vec<(i64, f64)> = groups.into_iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        Ok(sorted)
    }
}
