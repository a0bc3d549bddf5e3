use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ONEMAP_SEARCH_ENDPOINT: &str = "https://www.onemap.gov.sg/api/common/elastic/search";

/// Width of the distance bins, in meters
pub const DEFAULT_BIN_SIZE: f64 = 50.0;

pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub rdd: RddConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub plot: PlotStyle,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer token sent in the `Authorization` header
    #[serde(default)]
    pub token: String,
    /// Request timeout. Unset means the request may block indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    ONEMAP_SEARCH_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    concat!("demarc/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: String::new(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RddConfig {
    #[serde(default = "default_bin_size")]
    pub bin_size: f64,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

fn default_bin_size() -> f64 {
    DEFAULT_BIN_SIZE
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

impl Default for RddConfig {
    fn default() -> Self {
        Self {
            bin_size: default_bin_size(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

/// Header names of the columns read from the dataset
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ColumnConfig {
    #[serde(default = "default_distance_column")]
    pub distance: String,
    #[serde(default = "default_treatment_column")]
    pub treatment: String,
    #[serde(default = "default_log_price_column")]
    pub log_price: String,
    #[serde(default = "default_price_column")]
    pub price: String,
}

fn default_distance_column() -> String {
    "distance".into()
}
fn default_treatment_column() -> String {
    "treatment".into()
}
fn default_log_price_column() -> String {
    "log_price".into()
}
fn default_price_column() -> String {
    "Unit Price ($ PSM)".into()
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            distance: default_distance_column(),
            treatment: default_treatment_column(),
            log_price: default_log_price_column(),
            price: default_price_column(),
        }
    }
}

/// Figure styling, passed explicitly to the renderer
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlotStyle {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_control_color")]
    pub control_color: [u8; 3],
    #[serde(default = "default_treatment_color")]
    pub treatment_color: [u8; 3],
    #[serde(default = "default_binned_color")]
    pub binned_color: [u8; 3],
    #[serde(default = "default_boundary_color")]
    pub boundary_color: [u8; 3],
    /// Opacity of scatter points and histogram bars
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_marker_size")]
    pub marker_size: u32,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_font_size")]
    pub caption_size: u32,
}

fn default_width() -> u32 {
    1500
}
fn default_height() -> u32 {
    1200
}
fn default_control_color() -> [u8; 3] {
    [255, 0, 0]
}
fn default_treatment_color() -> [u8; 3] {
    [0, 0, 255]
}
fn default_binned_color() -> [u8; 3] {
    [0, 128, 0]
}
fn default_boundary_color() -> [u8; 3] {
    [0, 0, 0]
}
fn default_alpha() -> f64 {
    0.6
}
fn default_marker_size() -> u32 {
    3
}
fn default_font() -> String {
    "sans-serif".into()
}
fn default_font_size() -> u32 {
    20
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            control_color: default_control_color(),
            treatment_color: default_treatment_color(),
            binned_color: default_binned_color(),
            boundary_color: default_boundary_color(),
            alpha: default_alpha(),
            marker_size: default_marker_size(),
            font: default_font(),
            caption_size: default_font_size(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[geocoder]
token = "abc"

[rdd]
bin_size = 25.0

[plot]
control_color = [10, 20, 30]
"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.geocoder.token, "abc");
        assert_eq!(config.geocoder.endpoint, ONEMAP_SEARCH_ENDPOINT);
        assert_eq!(config.geocoder.timeout_secs, None);
        assert_eq!(config.rdd.bin_size, 25.0);
        assert_eq!(config.rdd.histogram_bins, DEFAULT_HISTOGRAM_BINS);
        assert_eq!(config.columns.price, "Unit Price ($ PSM)");
        assert_eq!(config.plot.control_color, [10, 20, 30]);
        assert_eq!(config.plot.treatment_color, [0, 0, 255]);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = Config::load_from_file("/nonexistent/demarc.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_or_default() {
        let config = Config::load_or_default(None::<&Path>).unwrap();
        assert_eq!(config.rdd.bin_size, DEFAULT_BIN_SIZE);
    }
}
