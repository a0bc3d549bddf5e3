//! OneMap forward geocoding client.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::response::SearchResponse;
use crate::config::GeocoderConfig;
use crate::models::Coordinates;

/// Single-address lookups against the OneMap search API
pub struct OneMapClient {
    client: Client,
    endpoint: Url,
    token: String,
}

impl OneMapClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid geocoder endpoint '{}'", config.endpoint))?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        if config.token.is_empty() {
            warn!("No geocoder token configured, requests will likely be rejected");
        }

        Ok(Self {
            client,
            endpoint,
            token: config.token.clone(),
        })
    }

    /// Search URL for `address`, first page, with geometry and address details
    pub fn search_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("searchVal", address)
            .append_pair("returnGeom", "Y")
            .append_pair("getAddrDetails", "Y")
            .append_pair("pageNum", "1");
        url
    }

    /// Coordinates of the first match for `address`.
    ///
    /// Every failure (transport error, non-success status, undecodable body,
    /// zero matches) yields `None`; callers cannot tell "not found" from
    /// "request failed".
    pub async fn geocode(&self, address: &str) -> Option<Coordinates> {
        info!("{}", address);

        let response = match self
            .client
            .get(self.search_url(address))
            .bearer_auth(&self.token)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("No results found for address: {} ({})", address, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(
                "No results found for address: {} (status {})",
                address, status
            );
            return None;
        }

        let body: SearchResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to parse geocoder response for {}: {}", address, e);
                return None;
            }
        };
        debug!("{} matches for {}", body.found, address);

        match body.first_match() {
            Some(result) => {
                info!("{} : {}", address, result.address);
                Some(Coordinates::new(
                    result.latitude.clone(),
                    result.longitude.clone(),
                ))
            }
            None => {
                warn!("No results found for address: {}", address);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_parameters() {
        let client = OneMapClient::new(&GeocoderConfig::default()).unwrap();
        let url = client.search_url("1 Beach Road & Co");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("searchVal".to_string(), "1 Beach Road & Co".to_string()),
                ("returnGeom".to_string(), "Y".to_string()),
                ("getAddrDetails".to_string(), "Y".to_string()),
                ("pageNum".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(url.path(), "/api/common/elastic/search");
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = GeocoderConfig {
            endpoint: "not a url".into(),
            ..GeocoderConfig::default()
        };
        assert!(OneMapClient::new(&config).is_err());
    }
}
