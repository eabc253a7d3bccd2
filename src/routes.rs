use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    forecast::{
        load_render_model,
        types::{Coordinates, RawForecast, RenderModel},
        ForecastError, ResponseCache, WeatherClient, WeatherClientError,
    },
    utils::{validate_coordinates, ErrorResponse},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cache: ResponseCache,
    pub weather_client: Arc<WeatherClient>,
}

// Request/Response types
#[derive(Debug, Deserialize)]
pub struct WeatherForm {
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub cached_locations: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

const FETCH_FAILED: &str = "Unable to fetch weather data.";

fn error_response(error: &ForecastError) -> ApiError {
    let (status, message, code) = match error {
        ForecastError::LocationNotFound => {
            (StatusCode::NOT_FOUND, "Location not found", "LOCATION_NOT_FOUND")
        }
        ForecastError::Upstream(WeatherClientError::InvalidCoordinates) => {
            (StatusCode::BAD_REQUEST, "Invalid coordinates", "INVALID_COORDINATES")
        }
        ForecastError::Upstream(_) => (StatusCode::BAD_GATEWAY, FETCH_FAILED, "UPSTREAM_ERROR"),
        ForecastError::Normalize(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED, "NORMALIZATION_ERROR")
        }
    };
    (status, Json(ErrorResponse::new(message, code)))
}

/// Forecast and timezone for the same coordinates, fetched together.
async fn fetch_forecast(
    client: &WeatherClient,
    coords: Coordinates,
) -> Result<(RawForecast, String), WeatherClientError> {
    tokio::try_join!(client.get_compact_forecast(coords), client.get_timezone(coords))
}

async fn forecast_for_location(
    state: &AppState,
    location: &str,
) -> Result<Arc<RenderModel>, ForecastError> {
    let hit = state
        .weather_client
        .geocode_search(location)
        .await?
        .ok_or(ForecastError::LocationNotFound)?;

    tracing::debug!("Geocoded {:?} to {}", location, hit.coordinates.cache_key());

    load_render_model(
        &state.cache,
        hit.coordinates,
        hit.display_name,
        Utc::now(),
        |coords| fetch_forecast(&state.weather_client, coords),
    )
    .await
}

// Route handlers
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_locations: state.cache.entry_count(),
    })
}

pub async fn weather_by_name(
    State(state): State<AppState>,
    Form(form): Form<WeatherForm>,
) -> Result<Json<Arc<RenderModel>>, ApiError> {
    match forecast_for_location(&state, &form.location).await {
        Ok(model) => Ok(Json(model)),
        Err(e) => {
            tracing::error!("Weather lookup for {:?} failed: {}", form.location, e);
            Err(error_response(&e))
        }
    }
}

pub async fn forecast_by_coordinates(
    State(state): State<AppState>,
    Query(params): Query<ForecastQuery>,
) -> Result<Json<Arc<RenderModel>>, ApiError> {
    if let Err(message) = validate_coordinates(params.lat, params.lon) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(&message, "INVALID_COORDINATES")),
        ));
    }

    let coords = Coordinates::rounded(params.lat, params.lon);
    let location = params
        .name
        .unwrap_or_else(|| format!("{}, {}", coords.lat, coords.lon));

    let result = load_render_model(&state.cache, coords, location, Utc::now(), |coords| {
        fetch_forecast(&state.weather_client, coords)
    })
    .await;

    match result {
        Ok(model) => Ok(Json(model)),
        Err(e) => {
            tracing::error!("Forecast for {} failed: {}", coords.cache_key(), e);
            Err(error_response(&e))
        }
    }
}

// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", post(weather_by_name))
        .route("/forecast", get(forecast_by_coordinates))
        .with_state(state)
}
