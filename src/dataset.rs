//! Tabular dataset of boundary observations.

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ColumnConfig;
use crate::error::DatasetError;
use crate::models::{Observation, TreatmentGroup};

/// Ordered collection of observations
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

/// Positions of the configured columns within a header row
struct ColumnIndices {
    distance: usize,
    treatment: usize,
    log_price: usize,
    price: usize,
}

impl ColumnIndices {
    fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            distance: find(columns.distance.as_str())?,
            treatment: find(columns.treatment.as_str())?,
            log_price: find(columns.log_price.as_str())?,
            price: find(columns.price.as_str())?,
        })
    }
}

impl Dataset {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Load a CSV file, transparently decompressing `.gz`
    pub fn from_csv_path(path: &Path, columns: &ColumnConfig) -> Result<Self, DatasetError> {
        info!("Loading observations from {}", path.display());

        let file = File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let dataset = Self::from_reader(reader, columns)?;
        info!("Loaded {} observations", dataset.len());
        Ok(dataset)
    }

    /// Parse CSV with a header row from any reader
    pub fn from_reader<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Self, DatasetError> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let idx = ColumnIndices::resolve(&headers, columns)?;
        debug!(
            "Column positions: distance={} treatment={} log_price={} price={}",
            idx.distance, idx.treatment, idx.log_price, idx.price
        );

        let mut observations = Vec::new();
        for (i, result) in csv_reader.records().enumerate() {
            let record = result?;
            // 1-based, counting the header line
            let row = i + 2;

            // `NaN` parses and stands for a missing value; an empty cell does not
            let number = |pos: usize, column: &str| -> Result<f64, DatasetError> {
                let raw = record.get(pos).unwrap_or("");
                raw.trim()
                    .parse::<f64>()
                    .map_err(|_| DatasetError::InvalidNumber {
                        row,
                        column: column.to_string(),
                        value: raw.to_string(),
                    })
            };

            let raw_treatment = record.get(idx.treatment).unwrap_or("");
            let treatment = TreatmentGroup::parse(raw_treatment).ok_or_else(|| {
                DatasetError::InvalidTreatment {
                    row,
                    column: columns.treatment.clone(),
                    value: raw_treatment.to_string(),
                }
            })?;

            observations.push(Observation {
                distance: number(idx.distance, columns.distance.as_str())?,
                treatment,
                log_price: number(idx.log_price, columns.log_price.as_str())?,
                price: number(idx.price, columns.price.as_str())?,
            });
        }

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

impl FromIterator<Observation> for Dataset {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}
