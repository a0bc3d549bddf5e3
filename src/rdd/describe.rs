//! Descriptive statistics per treatment group.

use serde::{Deserialize, Serialize};

use super::Sample;
use crate::models::{Observation, TreatmentGroup};

/// Count, moments and quartiles of one variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1), `NaN` below two values
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Describe {
    /// Summarize `values`, skipping `NaN` as missing.
    ///
    /// `count` is the number of values kept; every other statistic is `NaN`
    /// when none are.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = sorted.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Summary of the reported variables within one treatment group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: TreatmentGroup,
    pub log_price: Describe,
    pub price: Describe,
    pub distance: Describe,
}

fn describe_column(rows: &[&Observation], value: fn(&Observation) -> f64) -> Describe {
    let values: Vec<f64> = rows.iter().map(|o| value(o)).collect();
    Describe::from_values(&values)
}

impl GroupSummary {
    fn from_group<'a>(group: TreatmentGroup, rows: impl Iterator<Item = &'a Observation>) -> Self {
        let rows: Vec<&Observation> = rows.collect();
        Self {
            group,
            log_price: describe_column(&rows, |o| o.log_price),
            price: describe_column(&rows, |o| o.price),
            distance: describe_column(&rows, |o| o.distance),
        }
    }
}

/// One summary per group present in the sample, control first
pub fn describe_by_treatment(sample: &Sample) -> Vec<GroupSummary> {
    TreatmentGroup::all()
        .iter()
        .filter(|g| sample.group(**g).next().is_some())
        .map(|g| GroupSummary::from_group(*g, sample.group(*g)))
        .collect()
}
