use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::Arc;

mod config;
mod forecast;
mod routes;
mod utils;

use config::Config;
use forecast::{init_cache, WeatherClient};
use routes::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Upstream client for geocoding, forecasts and timezone lookups
    let weather_client = Arc::new(WeatherClient::new(config)?);

    // Lives for the whole process, shared by every request
    let cache = init_cache();

    let state = AppState {
        cache,
        weather_client,
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server starting on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
