//! Working sample restricted to the bandwidth window.

use crate::dataset::Dataset;
use crate::models::{Observation, TreatmentGroup};

/// Observations with `|distance| <= bandwidth`
#[derive(Debug, Clone)]
pub struct Sample {
    bandwidth: f64,
    observations: Vec<Observation>,
}

impl Sample {
    /// Keep only observations inside the symmetric window around the boundary.
    ///
    /// No validation is done on `bandwidth`: a negative value or `NaN` simply
    /// yields an empty sample.
    pub fn within_bandwidth(dataset: &Dataset, bandwidth: f64) -> Self {
        Self::from_observations(dataset.observations(), bandwidth)
    }

    pub fn from_observations(observations: &[Observation], bandwidth: f64) -> Self {
        Self {
            bandwidth,
            observations: observations
                .iter()
                .filter(|o| o.within(bandwidth))
                .copied()
                .collect(),
        }
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn group(&self, group: TreatmentGroup) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(move |o| o.treatment == group)
    }

    pub fn treatment_count(&self) -> usize {
        self.group(TreatmentGroup::Treatment).count()
    }

    pub fn control_count(&self) -> usize {
        self.len() - self.treatment_count()
    }

    /// `(min, max)` of the running variable, `None` when empty
    pub fn distance_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.observations.iter().map(|o| o.distance);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}
