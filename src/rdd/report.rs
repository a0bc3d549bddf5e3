//! Descriptive report for a bandwidth sample.
//!
//! [`RddReport::build`] only computes; rendering to text happens in the
//! `Display` impl and to a figure in [`super::plot`].

use serde::Serialize;
use std::fmt;
use tracing::info;

use super::binning::{aggregate_bins, BinSpec, BinSummary};
use super::describe::{describe_by_treatment, Describe, GroupSummary};
use super::histogram::{density_histogram, HistogramBin};
use super::Sample;
use crate::config::ColumnConfig;
use crate::error::BinningError;
use crate::models::{Observation, TreatmentGroup};

/// Histograms of the running variable and the response for one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupHistograms {
    pub group: TreatmentGroup,
    pub distance: Vec<HistogramBin>,
    pub log_price: Vec<HistogramBin>,
}

/// Display names of the summarized variables
#[derive(Debug, Clone, Serialize)]
pub struct VariableLabels {
    pub distance: String,
    pub log_price: String,
    pub price: String,
}

impl From<&ColumnConfig> for VariableLabels {
    fn from(columns: &ColumnConfig) -> Self {
        Self {
            distance: columns.distance.clone(),
            log_price: columns.log_price.clone(),
            price: columns.price.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RddReport {
    pub bandwidth: f64,
    pub bin_width: f64,
    pub sample_size: usize,
    pub treatment_count: usize,
    pub control_count: usize,
    pub distance_range: Option<(f64, f64)>,
    pub binned: Vec<BinSummary>,
    pub groups: Vec<GroupSummary>,
    pub histograms: Vec<GroupHistograms>,
    pub labels: VariableLabels,
}

impl RddReport {
    pub fn build(
        sample: &Sample,
        spec: BinSpec,
        histogram_bins: usize,
        columns: &ColumnConfig,
    ) -> Result<Self, BinningError> {
        let mut histograms = Vec::new();
        for &group in TreatmentGroup::all() {
            let rows: Vec<&Observation> = sample.group(group).collect();
            let distances: Vec<f64> = rows.iter().map(|o| o.distance).collect();
            let prices: Vec<f64> = rows.iter().map(|o| o.log_price).collect();
            histograms.push(GroupHistograms {
                group,
                distance: density_histogram(&distances, histogram_bins)?,
                log_price: density_histogram(&prices, histogram_bins)?,
            });
        }

        let report = Self {
            bandwidth: sample.bandwidth(),
            bin_width: spec.width(),
            sample_size: sample.len(),
            treatment_count: sample.treatment_count(),
            control_count: sample.control_count(),
            distance_range: sample.distance_range(),
            binned: aggregate_bins(sample, spec),
            groups: describe_by_treatment(sample),
            histograms,
            labels: VariableLabels::from(columns),
        };

        info!(
            "Built report for bandwidth {}: {} observations, {} bins",
            report.bandwidth,
            report.sample_size,
            report.binned.len()
        );
        Ok(report)
    }

    pub fn histograms_for(&self, group: TreatmentGroup) -> Option<&GroupHistograms> {
        self.histograms.iter().find(|h| h.group == group)
    }
}

const STAT_HEADERS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.4}", v)
    }
}

fn write_variable_table(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    groups: &[GroupSummary],
    pick: fn(&GroupSummary) -> &Describe,
) -> fmt::Result {
    writeln!(f, "{}", label)?;
    write!(f, "{:<10}", "treatment")?;
    for h in STAT_HEADERS {
        write!(f, "{:>12}", h)?;
    }
    writeln!(f)?;

    for g in groups {
        let d = pick(g);
        write!(f, "{:<10}{:>12}", g.group.to_string(), d.count)?;
        for v in [d.mean, d.std, d.min, d.q25, d.median, d.q75, d.max] {
            write!(f, "{:>12}", fmt_stat(v))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for RddReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sample size: {}", self.sample_size)?;
        writeln!(f, "Treatment group (inside): {}", self.treatment_count)?;
        writeln!(f, "Control group (outside): {}", self.control_count)?;
        match self.distance_range {
            Some((lo, hi)) => writeln!(f, "Distance range: {:.2} to {:.2}", lo, hi)?,
            None => writeln!(f, "Distance range: n/a")?,
        }

        writeln!(f)?;
        writeln!(f, "Summary Statistics by Treatment Status:")?;
        if self.groups.is_empty() {
            return writeln!(f, "(empty sample)");
        }
        write_variable_table(f, &self.labels.log_price, &self.groups, |g| &g.log_price)?;
        writeln!(f)?;
        write_variable_table(f, &self.labels.price, &self.groups, |g| &g.price)?;
        writeln!(f)?;
        write_variable_table(f, &self.labels.distance, &self.groups, |g| &g.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use approx::assert_relative_eq;

    fn scenario() -> Dataset {
        Dataset::from_observations(vec![
            Observation::new(-10.0, TreatmentGroup::Control, 1.0, 2.72),
            Observation::new(-5.0, TreatmentGroup::Control, 2.0, 7.39),
            Observation::new(0.0, TreatmentGroup::Treatment, 3.0, 20.09),
            Observation::new(4.0, TreatmentGroup::Treatment, 4.0, 54.6),
            Observation::new(9.0, TreatmentGroup::Treatment, 5.0, 148.4),
            Observation::new(250.0, TreatmentGroup::Treatment, 9.0, 8103.1),
        ])
    }

    #[test]
    fn test_report_contents() {
        let sample = Sample::within_bandwidth(&scenario(), 10.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 30, &ColumnConfig::default()).unwrap();

        assert_eq!(report.sample_size, 5);
        assert_eq!(report.treatment_count, 3);
        assert_eq!(report.control_count, 2);
        assert_eq!(report.distance_range, Some((-10.0, 9.0)));
        assert_eq!(report.binned.len(), 1);
        assert_relative_eq!(report.binned[0].center, 15.0);
        assert_relative_eq!(report.binned[0].mean, 3.0);
        assert_eq!(report.groups.len(), 2);

        let control = report.histograms_for(TreatmentGroup::Control).unwrap();
        assert_eq!(control.distance.len(), 30);
        assert_eq!(control.distance.iter().map(|b| b.count).sum::<u64>(), 2);
    }

    #[test]
    fn test_console_rendering() {
        let sample = Sample::within_bandwidth(&scenario(), 10.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 30, &ColumnConfig::default()).unwrap();
        let text = report.to_string();

        assert!(text.starts_with(
            "Sample size: 5\nTreatment group (inside): 3\nControl group (outside): 2\nDistance range: -10.00 to 9.00\n"
        ));
        assert!(text.contains("Summary Statistics by Treatment Status:"));
        assert!(text.contains("Unit Price ($ PSM)"));
        assert!(text.contains("log_price"));
        let control_row = text
            .lines()
            .find(|l| l.starts_with("0 "))
            .unwrap();
        assert!(control_row.contains("1.5000"));
    }

    #[test]
    fn test_empty_sample_report() {
        let sample = Sample::within_bandwidth(&scenario(), -1.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 30, &ColumnConfig::default()).unwrap();
        assert_eq!(report.sample_size, 0);
        assert!(report.binned.is_empty());
        assert!(report.groups.is_empty());
        let text = report.to_string();
        assert!(text.contains("Distance range: n/a"));
        assert!(text.contains("(empty sample)"));
    }

    #[test]
    fn test_serializes_to_json() {
        let sample = Sample::within_bandwidth(&scenario(), 10.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 5, &ColumnConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sample_size"], 5);
        assert_eq!(json["binned"][0]["center"], 15.0);
        assert_eq!(json["groups"][0]["group"], "control");
    }
}
