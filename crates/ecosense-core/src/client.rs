//! HTTP clients for the telemetry store and the weather forecast endpoint.
//!
//! Both clients are thin reqwest wrappers with a fixed request timeout and
//! no retry logic: a failed fetch surfaces as an error, the caller reports a
//! status change, and the next scheduled tick retries naturally.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use ecosense_types::RawSnapshot;

use crate::error::{Error, Result};
use crate::traits::{ForecastSource, TelemetrySource};

/// Request timeout for both endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn validate_url(url: &str) -> Result<String> {
    let url = url.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {url}"
        )));
    }
    Ok(url)
}

fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Client for the remote telemetry store.
///
/// The store is addressed by one full endpoint URL returning the whole
/// dataset as a JSON object (or `null` when empty); there are no query
/// parameters and no pagination.
#[derive(Debug, Clone)]
pub struct TelemetryClient {
    client: Client,
    url: String,
}

impl TelemetryClient {
    /// Create a new client for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for a non-HTTP URL, or [`Error::Http`]
    /// if the underlying client cannot be built.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: validate_url(url)?,
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TelemetrySource for TelemetryClient {
    async fn fetch_snapshot(&self) -> Result<RawSnapshot> {
        debug!(url = %self.url, "fetching telemetry snapshot");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        // The store returns `null` rather than `{}` before the first upload.
        let snapshot: Option<RawSnapshot> = response.json().await?;
        Ok(snapshot.unwrap_or_default())
    }
}

/// Shape of the forecast endpoint's response; only the weather code is used.
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weathercode: i32,
}

/// Client for the external weather forecast endpoint.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    url: String,
}

impl ForecastClient {
    /// Create a new client for the given forecast URL (must request
    /// `current_weather`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for a non-HTTP URL, or [`Error::Http`]
    /// if the underlying client cannot be built.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            url: validate_url(url)?,
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ForecastSource for ForecastClient {
    async fn fetch_weather_code(&self) -> Result<i32> {
        debug!(url = %self.url, "fetching weather forecast");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(forecast.current_weather.weathercode)
    }
}
