//! Wire types for the OneMap search endpoint.

use serde::{Deserialize, Deserializer};

/// Body of a search response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Total number of matches across all pages
    pub found: i64,
    #[serde(rename = "totalNumPages", default)]
    pub total_num_pages: Option<u32>,
    #[serde(rename = "pageNum", default)]
    pub page_num: Option<u32>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "SEARCHVAL", default)]
    pub search_val: Option<String>,
    #[serde(rename = "BLK_NO", default)]
    pub block: Option<String>,
    #[serde(rename = "ROAD_NAME", default)]
    pub road_name: Option<String>,
    #[serde(rename = "BUILDING", default)]
    pub building: Option<String>,
    #[serde(rename = "POSTAL", default)]
    pub postal: Option<String>,
    /// Full matched address label
    #[serde(rename = "ADDRESS", default)]
    pub address: String,
    #[serde(rename = "LATITUDE", deserialize_with = "string_or_number")]
    pub latitude: String,
    #[serde(rename = "LONGITUDE", deserialize_with = "string_or_number")]
    pub longitude: String,
}

/// Coordinates come back as strings, but accept bare numbers too
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

impl SearchResponse {
    /// First result, if the service reported any matches
    pub fn first_match(&self) -> Option<&SearchResult> {
        if self.found > 0 {
            self.results.first()
        } else {
            None
        }
    }
}
