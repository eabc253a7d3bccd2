use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use super::cache::ResponseCache;
use super::client::WeatherClientError;
use super::normalize::{normalize, NormalizeError};
use super::types::*;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Location not found")]
    LocationNotFound,
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] WeatherClientError),
    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Serves the render model for `coords` from the cache, or fetches, normalizes
/// and stores a fresh one. `fetch` yields the raw forecast and the timezone id.
///
/// On a hit the stored model is returned as-is, including its location name.
/// Nothing is stored when fetching or normalizing fails.
pub async fn load_render_model<F, Fut>(
    cache: &ResponseCache,
    coords: Coordinates,
    location: String,
    now: DateTime<Utc>,
    fetch: F,
) -> Result<Arc<RenderModel>, ForecastError>
where
    F: FnOnce(Coordinates) -> Fut,
    Fut: Future<Output = Result<(RawForecast, String), WeatherClientError>>,
{
    if let Some(record) = cache.get(coords, now).await {
        tracing::debug!("Cache hit for {} (stored at {})", coords.cache_key(), record.stored_at);
        return Ok(record.render_model);
    }

    tracing::debug!("Cache miss for {}, fetching forecast", coords.cache_key());
    let (raw, timezone_id) = fetch(coords).await?;

    let (mut weather, timeseries) = raw.replace_timeseries(Vec::new());
    let normalized = normalize(timeseries, &timezone_id, now)?;
    weather.properties.timeseries = normalized.timeseries;

    let render_model = Arc::new(RenderModel {
        weather,
        location,
        grouped_by_day: normalized.grouped_by_day,
        is_night: normalized.is_night,
    });

    cache.put(coords, Arc::clone(&render_model), now).await;
    tracing::info!(
        "Cached forecast for {} ({} entries, {} days, tz {}) for {} minutes",
        coords.cache_key(),
        render_model.weather.properties.timeseries.len(),
        render_model.grouped_by_day.len(),
        timezone_id,
        cache.ttl().num_minutes()
    );

    Ok(render_model)
}
