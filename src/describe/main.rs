//! Boundary discontinuity descriptives.
//!
//! Loads a transaction dataset, restricts it to a bandwidth around the
//! boundary, prints the summary report and optionally renders the figure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use demarc::config::Config;
use demarc::rdd::{render_svg, BinSpec, RddReport, Sample};
use demarc::Dataset;

#[derive(Parser, Debug)]
#[command(name = "describe")]
#[command(about = "Descriptive statistics and plots around a spatial boundary")]
struct Args {
    /// CSV dataset (optionally .gz)
    #[arg(short, long)]
    data: PathBuf,

    /// Bandwidth around the boundary, in meters
    #[arg(short, long)]
    bandwidth: f64,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Width of the distance bins (overrides the config file)
    #[arg(long)]
    bin_size: Option<f64>,

    /// Number of histogram bins (overrides the config file)
    #[arg(long)]
    histogram_bins: Option<usize>,

    /// Write the 2x2 figure to this SVG file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_ref())?;
    if let Some(bin_size) = args.bin_size {
        config.rdd.bin_size = bin_size;
    }
    if let Some(bins) = args.histogram_bins {
        config.rdd.histogram_bins = bins;
    }

    let dataset = Dataset::from_csv_path(&args.data, &config.columns)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;

    let sample = Sample::within_bandwidth(&dataset, args.bandwidth);
    info!(
        "{} of {} observations within {} m of the boundary",
        sample.len(),
        dataset.len(),
        args.bandwidth
    );

    let spec = BinSpec::new(config.rdd.bin_size)?;
    let report = RddReport::build(&sample, spec, config.rdd.histogram_bins, &config.columns)?;

    if let Some(path) = &args.plot {
        render_svg(path, &sample, &report, &config.plot)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
