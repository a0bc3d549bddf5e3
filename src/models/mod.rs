//! Core data models shared by the geocoder and the boundary analysis.

pub mod coordinates;
pub mod observation;

pub use coordinates::Coordinates;
pub use observation::{Observation, TreatmentGroup};
