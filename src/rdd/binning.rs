//! Fixed-width binning of the running variable.
//!
//! Bins are anchored at the sample minimum and are half-open (`[start, end)`),
//! so a distance lying exactly on an edge belongs to the higher bin. Enough
//! bins are generated that the last upper edge is strictly above the sample
//! maximum. Treatment status plays no part here: each bin averages over both
//! sides of the boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::Sample;
use crate::config::DEFAULT_BIN_SIZE;
use crate::dataset::Dataset;
use crate::error::BinningError;

/// Bin width along the distance axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    width: f64,
}

impl BinSpec {
    pub fn new(width: f64) -> Result<Self, BinningError> {
        if width.is_finite() && width > 0.0 {
            Ok(Self { width })
        } else {
            Err(BinningError::InvalidWidth(width))
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

impl Default for BinSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_BIN_SIZE,
        }
    }
}

/// Half-open interval `[start, end)` of the distance axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
}

impl Bin {
    /// The `i`-th bin of width `width` anchored at `min`
    fn nth(min: f64, width: f64, i: usize) -> Self {
        Self {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
        }
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn contains(&self, distance: f64) -> bool {
        self.start <= distance && distance < self.end
    }
}

/// Mean response within one non-empty bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSummary {
    pub center: f64,
    pub mean: f64,
    /// Number of observations averaged
    pub count: usize,
}

/// Consecutive bins covering `[min, max]`.
///
/// Allocates every bin across the range, empty or not. Returns no bins for
/// `None` or a non-finite range.
pub fn generate_bins(range: Option<(f64, f64)>, spec: BinSpec) -> Vec<Bin> {
    let Some((min, max)) = range else {
        return Vec::new();
    };
    if !min.is_finite() || !max.is_finite() || max < min {
        return Vec::new();
    }

    let width = spec.width();
    let mut n = ((max - min) / width).floor() as usize + 1;
    // Rounding in the edges must not leave the maximum on the last upper edge
    while Bin::nth(min, width, n - 1).end <= max {
        n += 1;
    }

    (0..n).map(|i| Bin::nth(min, width, i)).collect()
}

/// Index of the bin anchored at `min` that contains `distance`
fn locate(min: f64, width: f64, distance: f64) -> Option<usize> {
    let guess = ((distance - min) / width).floor();
    if !guess.is_finite() || guess < 0.0 {
        return None;
    }
    let mut idx = guess as usize;

    while idx > 0 && distance < Bin::nth(min, width, idx).start {
        idx -= 1;
    }
    while distance >= Bin::nth(min, width, idx).end {
        idx += 1;
    }

    Bin::nth(min, width, idx).contains(distance).then_some(idx)
}

/// Mean `log_price` per non-empty bin, in ascending distance order.
///
/// Only occupied bins are materialized, so a sparse sample spread over a
/// huge range costs no more than a dense one. A `NaN` response is treated as
/// missing: it is left out of the mean and the count, and a bin holding only
/// missing responses is dropped.
pub fn aggregate_bins(sample: &Sample, spec: BinSpec) -> Vec<BinSummary> {
    let Some((min, max)) = sample.distance_range() else {
        return Vec::new();
    };
    if !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }

    let width = spec.width();
    let mut occupied: BTreeMap<usize, (f64, usize)> = BTreeMap::new();
    for obs in sample.observations() {
        if obs.log_price.is_nan() {
            continue;
        }
        if let Some(idx) = locate(min, width, obs.distance) {
            let (sum, count) = occupied.entry(idx).or_insert((0.0, 0));
            *sum += obs.log_price;
            *count += 1;
        }
    }

    let summaries: Vec<BinSummary> = occupied
        .into_iter()
        .map(|(idx, (sum, count))| BinSummary {
            center: Bin::nth(min, width, idx).center(),
            mean: sum / count as f64,
            count,
        })
        .collect();

    debug!(
        "Binned {} observations into {} occupied bins (width {})",
        sample.len(),
        summaries.len(),
        width
    );

    summaries
}

/// Filter `dataset` to the bandwidth window and average `log_price` per 50 m bin
pub fn bin_and_aggregate(dataset: &Dataset, bandwidth: f64) -> Vec<BinSummary> {
    let sample = Sample::within_bandwidth(dataset, bandwidth);
    aggregate_bins(&sample, BinSpec::default())
}
