use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub nominatim_base_url: String,
    pub nominatim_search_path: String,
    pub met_base_url: String,
    pub met_forecast_path: String,
    pub open_meteo_base_url: String,
    pub open_meteo_forecast_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let request_timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a whole number, got {}", raw))?,
            Err(_) => 30,
        };

        Ok(Config {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            user_agent: env::var("HTTP_USER_AGENT")
                .unwrap_or_else(|_| "ForecastServer/0.1 (+https://github.com/forecast-server)".to_string()),
            request_timeout_secs,
            nominatim_base_url: env::var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            nominatim_search_path: env::var("NOMINATIM_SEARCH_PATH")
                .unwrap_or_else(|_| "/search".to_string()),
            met_base_url: env::var("MET_BASE_URL")
                .unwrap_or_else(|_| "https://api.met.no".to_string()),
            met_forecast_path: env::var("MET_FORECAST_PATH")
                .unwrap_or_else(|_| "/weatherapi/locationforecast/2.0/compact".to_string()),
            open_meteo_base_url: env::var("OPEN_METEO_BASE_URL")
                .unwrap_or_else(|_| "https://api.open-meteo.com".to_string()),
            open_meteo_forecast_path: env::var("OPEN_METEO_FORECAST_PATH")
                .unwrap_or_else(|_| "/v1/forecast".to_string()),
        })
    }

    /// Points every upstream at the same base URL. Used by tests against a mock server.
    #[cfg(test)]
    pub fn for_base_url(base_url: &str) -> Self {
        Config {
            bind_addr: "127.0.0.1:0".to_string(),
            user_agent: "ForecastServerTest/0.1".to_string(),
            request_timeout_secs: 5,
            nominatim_base_url: base_url.to_string(),
            nominatim_search_path: "/search".to_string(),
            met_base_url: base_url.to_string(),
            met_forecast_path: "/weatherapi/locationforecast/2.0/compact".to_string(),
            open_meteo_base_url: base_url.to_string(),
            open_meteo_forecast_path: "/v1/forecast".to_string(),
        }
    }
}
