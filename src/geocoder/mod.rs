//! Address geocoding against the OneMap search API.

mod client;
mod response;

pub use client::OneMapClient;
pub use response::{SearchResponse, SearchResult};
