//! Observation records for the boundary design.

use serde::{Deserialize, Serialize};

/// Which side of the boundary an observation lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentGroup {
    /// Outside the region (`treatment = 0`)
    Control,
    /// Inside the region (`treatment = 1`)
    Treatment,
}

impl TreatmentGroup {
    /// Both groups, control first
    pub fn all() -> &'static [TreatmentGroup] {
        &[TreatmentGroup::Control, TreatmentGroup::Treatment]
    }

    /// The 0/1 indicator used in the source data
    pub fn indicator(self) -> u8 {
        match self {
            TreatmentGroup::Control => 0,
            TreatmentGroup::Treatment => 1,
        }
    }

    /// Parse a treatment cell: `0`/`1`, `0.0`/`1.0` or `true`/`false`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "0" | "0.0" | "false" => Some(TreatmentGroup::Control),
            "1" | "1.0" | "true" => Some(TreatmentGroup::Treatment),
            _ => None,
        }
    }

    /// Legend label used in the figure
    pub fn label(self) -> &'static str {
        match self {
            TreatmentGroup::Control => "Outside (Control)",
            TreatmentGroup::Treatment => "Inside (Treatment)",
        }
    }
}

impl std::fmt::Display for TreatmentGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.indicator())
    }
}

/// One transaction, positioned relative to the boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Signed distance to the boundary in meters
    pub distance: f64,
    pub treatment: TreatmentGroup,
    /// Response variable
    pub log_price: f64,
    /// Untransformed unit price, only used for reporting
    pub price: f64,
}

impl Observation {
    pub fn new(distance: f64, treatment: TreatmentGroup, log_price: f64, price: f64) -> Self {
        Self {
            distance,
            treatment,
            log_price,
            price,
        }
    }

    /// Whether the observation lies inside `[-bandwidth, +bandwidth]`
    pub fn within(&self, bandwidth: f64) -> bool {
        self.distance.abs() <= bandwidth
    }
}
