//! Demarc - address geocoding and boundary discontinuity descriptives
//!
//! This library provides shared types and modules for the geocode and describe binaries.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geocoder;
pub mod models;
pub mod rdd;

pub use config::Config;
pub use dataset::Dataset;
pub use geocoder::OneMapClient;
pub use models::{Coordinates, Observation, TreatmentGroup};
pub use rdd::{bin_and_aggregate, BinSummary, RddReport, Sample};
