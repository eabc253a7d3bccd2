use super::types::*;
use crate::config::Config;
use crate::utils::validate_coordinates;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

#[derive(Error, Debug)]
pub enum WeatherClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("Rate limited, retry after: {0}s")]
    RateLimited(u64),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Invalid coordinates")]
    InvalidCoordinates,
    #[error("Geocoder returned unusable coordinates: {0}")]
    InvalidGeocode(String),
}

/// Talks to the geocoder, the forecast API and the timezone lookup.
pub struct WeatherClient {
    client: Client,
    config: Config,
    initial_backoff: Duration,
}

impl WeatherClient {
    pub fn new(config: Config) -> Result<Self, WeatherClientError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            initial_backoff: Duration::from_millis(1000),
        })
    }

    /// Looks up the best match for free text. `None` when nothing matched.
    pub async fn geocode_search(&self, query: &str) -> Result<Option<GeocodeHit>, WeatherClientError> {
        let url = format!(
            "{}{}",
            self.config.nominatim_base_url, self.config.nominatim_search_path
        );

        let response = self
            .make_request_with_retry(&url, &[("q", query), ("format", "json"), ("limit", "1")])
            .await?;

        let results: Vec<GeocodeResponse> = serde_json::from_value(response)?;
        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        let lat = first
            .lat
            .trim()
            .parse::<f64>()
            .map_err(|_| WeatherClientError::InvalidGeocode(first.lat.clone()))?;
        let lon = first
            .lon
            .trim()
            .parse::<f64>()
            .map_err(|_| WeatherClientError::InvalidGeocode(first.lon.clone()))?;

        Ok(Some(GeocodeHit {
            coordinates: Coordinates::rounded(lat, lon),
            display_name: first.display_name,
        }))
    }

    pub async fn get_compact_forecast(&self, coords: Coordinates) -> Result<RawForecast, WeatherClientError> {
        if validate_coordinates(coords.lat, coords.lon).is_err() {
            return Err(WeatherClientError::InvalidCoordinates);
        }

        let url = format!("{}{}", self.config.met_base_url, self.config.met_forecast_path);

        let response = self
            .make_request_with_retry(&url, &[
                ("lat", &coords.lat.to_string()),
                ("lon", &coords.lon.to_string()),
            ])
            .await?;

        let forecast: RawForecast = serde_json::from_value(response)?;
        Ok(forecast)
    }

    /// IANA timezone identifier for the coordinates.
    pub async fn get_timezone(&self, coords: Coordinates) -> Result<String, WeatherClientError> {
        if validate_coordinates(coords.lat, coords.lon).is_err() {
            return Err(WeatherClientError::InvalidCoordinates);
        }

        let url = format!(
            "{}{}",
            self.config.open_meteo_base_url, self.config.open_meteo_forecast_path
        );

        let response = self
            .make_request_with_retry(&url, &[
                ("latitude", &coords.lat.to_string()),
                ("longitude", &coords.lon.to_string()),
                ("timezone", "auto"),
            ])
            .await?;

        let lookup: TimezoneResponse = serde_json::from_value(response)?;
        Ok(lookup.timezone)
    }

    async fn make_request_with_retry(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, WeatherClientError> {
        let mut retry_count = 0;
        let max_retries = 3;
        let mut delay = self.initial_backoff;

        loop {
            let response = self.client.get(url).query(params).send().await?;

            match response.status() {
                reqwest::StatusCode::OK => {
                    let json: Value = response.json().await?;
                    return Ok(json);
                }
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    if retry_count >= max_retries {
                        return Err(WeatherClientError::RateLimited(delay.as_secs()));
                    }

                    tracing::warn!("Rate limited by {}, retrying in {}ms", url, delay.as_millis());

                    sleep(delay).await;
                    delay = delay.mul_f32(2.0 + fastrand::f32() * 0.5); // Exponential backoff with jitter
                    retry_count += 1;
                }
                status => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(WeatherClientError::ApiError(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
impl WeatherClient {
    pub fn with_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }
}
