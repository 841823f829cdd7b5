//! Client for a running `/api/temperature` endpoint
//!
//! Used by the terminal viewer to load the aggregated payload once.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::TemperaturePayload;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors that can occur when loading the payload
#[derive(Debug, Error)]
pub enum PayloadError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The server answered with an `{error}` body
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Error body returned by the API on failure
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
}

/// Fetches the temperature payload from a server base URL
#[derive(Debug, Clone)]
pub struct PayloadClient {
    client: Client,
    base_url: String,
}

impl PayloadClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Loads the payload from `{base_url}/api/temperature`
    pub async fn fetch(&self) -> Result<TemperaturePayload, PayloadError> {
        let url = format!("{}/api/temperature", self.base_url.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            return Err(PayloadError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
