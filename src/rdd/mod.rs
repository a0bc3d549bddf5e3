//! Descriptive analysis around a spatial boundary.
//!
//! A [`Sample`] is the slice of a dataset within the bandwidth window; the
//! binned series, grouped statistics and histograms are all computed from it.

pub mod binning;
pub mod describe;
pub mod histogram;
pub mod plot;
pub mod report;
mod sample;

pub use binning::{aggregate_bins, bin_and_aggregate, generate_bins, Bin, BinSpec, BinSummary};
pub use describe::{describe_by_treatment, Describe, GroupSummary};
pub use histogram::{density_histogram, HistogramBin};
pub use plot::{render_svg, render_svg_string};
pub use report::{GroupHistograms, RddReport, VariableLabels};
pub use sample::Sample;
