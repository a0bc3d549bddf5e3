//! 2×2 descriptive figure: scatter, binned means and per-group histograms.

use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use super::histogram::HistogramBin;
use super::report::RddReport;
use super::Sample;
use crate::config::PlotStyle;
use crate::models::TreatmentGroup;

const DISTANCE_DESC: &str = "Distance to Historic Boundary";

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

fn group_color(group: TreatmentGroup, style: &PlotStyle) -> RGBColor {
    match group {
        TreatmentGroup::Control => rgb(style.control_color),
        TreatmentGroup::Treatment => rgb(style.treatment_color),
    }
}

fn short_label(group: TreatmentGroup) -> &'static str {
    match group {
        TreatmentGroup::Control => "Outside",
        TreatmentGroup::Treatment => "Inside",
    }
}

/// Axis range over `values` with 5% padding; `fallback` when there is nothing to show
fn axis_range(values: impl Iterator<Item = f64>, fallback: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return fallback;
    }
    if hi - lo < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Render the figure to an SVG file
pub fn render_svg(path: &Path, sample: &Sample, report: &RddReport, style: &PlotStyle) -> Result<()> {
    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw_panels(&root, sample, report, style)?;
    root.present()?;
    info!("Wrote figure to {}", path.display());
    Ok(())
}

/// Render the figure into an in-memory SVG document
pub fn render_svg_string(sample: &Sample, report: &RddReport, style: &PlotStyle) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (style.width, style.height)).into_drawing_area();
        draw_panels(&root, sample, report, style)?;
        root.present()?;
    }
    Ok(buf)
}

fn draw_panels(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    sample: &Sample,
    report: &RddReport,
    style: &PlotStyle,
) -> Result<()> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    let bw = report.bandwidth.abs().max(1.0);
    let x_range = axis_range(sample.observations().iter().map(|o| o.distance), (-bw, bw));

    draw_scatter(&panels[0], sample, x_range, style)?;
    draw_binned(&panels[1], report, x_range, style)?;

    let distance_hists: Vec<(TreatmentGroup, &[HistogramBin])> = report
        .histograms
        .iter()
        .map(|h| (h.group, h.distance.as_slice()))
        .collect();
    draw_histograms(
        &panels[2],
        "Distribution of Running Variable",
        DISTANCE_DESC,
        &distance_hists,
        true,
        style,
    )?;

    let price_hists: Vec<(TreatmentGroup, &[HistogramBin])> = report
        .histograms
        .iter()
        .map(|h| (h.group, h.log_price.as_slice()))
        .collect();
    draw_histograms(
        &panels[3],
        "Price Distribution by Treatment Status",
        "Log Price ($ PSM)",
        &price_hists,
        false,
        style,
    )?;

    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    sample: &Sample,
    x_range: (f64, f64),
    style: &PlotStyle,
) -> Result<()> {
    let (y_lo, y_hi) = axis_range(sample.observations().iter().map(|o| o.log_price), (0.0, 1.0));

    let mut chart = ChartBuilder::on(area)
        .caption(
            "RDD Plot: Log Price vs Distance to Boundary",
            (style.font.as_str(), style.caption_size),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(DISTANCE_DESC)
        .y_desc("Log Price ($ PSM)")
        .draw()?;

    let size = style.marker_size;
    for &group in TreatmentGroup::all() {
        let color = group_color(group, style);
        let fill = color.mix(style.alpha).filled();
        chart
            .draw_series(
                sample
                    .group(group)
                    .map(|o| Circle::new((o.distance, o.log_price), size, fill)),
            )?
            .label(group.label())
            .legend(move |(x, y)| Circle::new((x, y), size, color.filled()));
    }

    draw_boundary(&mut chart, x_range, (y_lo, y_hi), style)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_binned(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    report: &RddReport,
    x_range: (f64, f64),
    style: &PlotStyle,
) -> Result<()> {
    let (y_lo, y_hi) = axis_range(report.binned.iter().map(|b| b.mean), (0.0, 1.0));
    // Centers can sit past the sample maximum by up to half a bin
    let x_range = axis_range(
        report
            .binned
            .iter()
            .map(|b| b.center)
            .chain([x_range.0, x_range.1]),
        x_range,
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Binned RDD Plot", (style.font.as_str(), style.caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.0..x_range.1, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(DISTANCE_DESC)
        .y_desc("Mean Log Price ($ psf)")
        .draw()?;

    let color = rgb(style.binned_color);
    let points: Vec<(f64, f64)> = report.binned.iter().map(|b| (b.center, b.mean)).collect();
    chart.draw_series(LineSeries::new(points.iter().copied(), color))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, style.marker_size + 1, color.filled())),
    )?;

    draw_boundary(&mut chart, x_range, (y_lo, y_hi), style)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_boundary(
    chart: &mut ChartContext<'_, SVGBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_range: (f64, f64),
    y_range: (f64, f64),
    style: &PlotStyle,
) -> Result<()> {
    if x_range.0 > 0.0 || x_range.1 < 0.0 {
        return Ok(());
    }
    let color = rgb(style.boundary_color);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, y_range.0), (0.0, y_range.1)],
            color.stroke_width(2),
        )))?
        .label("Historic Boundary")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    Ok(())
}

fn draw_histograms(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    caption: &str,
    x_desc: &str,
    hists: &[(TreatmentGroup, &[HistogramBin])],
    boundary: bool,
    style: &PlotStyle,
) -> Result<()> {
    let edges = hists
        .iter()
        .flat_map(|(_, bins)| bins.iter().flat_map(|b| [b.range_start, b.range_end]));
    let (x_lo, x_hi) = axis_range(edges, (-1.0, 1.0));
    let y_hi = hists
        .iter()
        .flat_map(|(_, bins)| bins.iter().map(|b| b.density))
        .fold(0.0f64, f64::max)
        .max(1e-6)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (style.font.as_str(), style.caption_size))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Density")
        .draw()?;

    for &(group, bins) in hists {
        let color = group_color(group, style);
        let fill = color.mix(style.alpha).filled();
        chart
            .draw_series(
                bins.iter()
                    .map(|b| Rectangle::new([(b.range_start, 0.0), (b.range_end, b.density)], fill)),
            )?
            .label(short_label(group))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if boundary {
        draw_boundary(&mut chart, (x_lo, x_hi), (0.0, y_hi), style)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnConfig;
    use crate::models::Observation;
    use crate::rdd::BinSpec;

    fn sample(bandwidth: f64) -> Sample {
        let data: Vec<Observation> = (0..40)
            .map(|i| {
                let d = -200.0 + i as f64 * 10.0;
                let group = if d >= 0.0 {
                    TreatmentGroup::Treatment
                } else {
                    TreatmentGroup::Control
                };
                Observation::new(d, group, 7.0 + d / 1000.0, (7.0 + d / 1000.0).exp())
            })
            .collect();
        Sample::from_observations(&data, bandwidth)
    }

    #[test]
    fn test_renders_all_panels() {
        let sample = sample(150.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 30, &ColumnConfig::default()).unwrap();
        let style = PlotStyle {
            width: 800,
            height: 600,
            ..PlotStyle::default()
        };
        let svg = render_svg_string(&sample, &report, &style).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Binned RDD Plot"));
        assert!(svg.contains("Distribution of Running Variable"));
        assert!(svg.contains("Price Distribution by Treatment Status"));
    }

    #[test]
    fn test_empty_sample_still_renders() {
        let sample = sample(-1.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 30, &ColumnConfig::default()).unwrap();
        let svg = render_svg_string(&sample, &report, &PlotStyle::default()).unwrap();
        assert!(svg.contains("RDD Plot: Log Price vs Distance to Boundary"));
    }

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdd.svg");
        let sample = sample(100.0);
        let report =
            RddReport::build(&sample, BinSpec::default(), 10, &ColumnConfig::default()).unwrap();
        render_svg(&path, &sample, &report, &PlotStyle::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("</svg>"));
    }

    #[test]
    fn test_axis_range() {
        assert_eq!(axis_range([].into_iter(), (-5.0, 5.0)), (-5.0, 5.0));
        assert_eq!(axis_range([2.0].into_iter(), (-5.0, 5.0)), (1.0, 3.0));
        let (lo, hi) = axis_range([0.0, 10.0].into_iter(), (0.0, 1.0));
        assert!(lo < 0.0 && hi > 10.0);
    }
}
