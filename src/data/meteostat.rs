//! Meteostat daily data client (RapidAPI)
//!
//! Fetches daily station records from the `stations/daily` endpoint and
//! returns them as observations.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::{into_observations, DailyObservation, DailyRecord};
use crate::config::Config;

/// Default base URL for the Meteostat RapidAPI endpoint
pub const METEOSTAT_BASE_URL: &str = "https://meteostat.p.rapidapi.com";

/// Default RapidAPI host header value
pub const METEOSTAT_HOST: &str = "meteostat.p.rapidapi.com";

/// Toronto (Pearson) station identifier
pub const DEFAULT_STATION: &str = "71624";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when fetching station data
#[derive(Debug, Error)]
pub enum MeteostatError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// `stations/daily` response body
#[derive(Debug, Deserialize)]
struct DailyResponse {
    data: Vec<DailyRecord>,
}

/// Client for the Meteostat daily station endpoint
#[derive(Debug, Clone)]
pub struct MeteostatClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_host: String,
    station: String,
}

impl MeteostatClient {
    /// Creates a client from the loaded configuration
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
            station: config.station.clone(),
        }
    }

    /// Creates a client against a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: Some("test-key".to_string()),
            api_host: METEOSTAT_HOST.to_string(),
            station: DEFAULT_STATION.to_string(),
        }
    }

    /// The station this client queries
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Fetches every daily observation for a calendar year
    pub async fn fetch_year(&self, year: i32) -> Result<Vec<DailyObservation>, MeteostatError> {
        let start = format!("{:04}-01-01", year);
        let end = format!("{:04}-12-31", year);
        self.fetch_daily(&start, &end).await
    }

    /// Fetches daily observations between two `YYYY-MM-DD` dates, inclusive
    pub async fn fetch_daily(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<DailyObservation>, MeteostatError> {
        let url = format!("{}/stations/daily", self.base_url.trim_end_matches('/'));

        let mut request = self
            .client
            .get(&url)
            .query(&[("start", start), ("end", end), ("station", self.station.as_str())])
            .header("X-RapidAPI-Host", &self.api_host);
        if let Some(key) = &self.api_key {
            request = request.header("X-RapidAPI-Key", key);
        }

        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        parse_response(&text)
    }
}

/// Parse a `stations/daily` body into observations
fn parse_response(body: &str) -> Result<Vec<DailyObservation>, MeteostatError> {
    let response: DailyResponse = serde_json::from_str(body)?;
    Ok(into_observations(response.data))
}
