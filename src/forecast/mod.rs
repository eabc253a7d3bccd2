pub mod cache;
pub mod client;
#[cfg(test)]
pub mod mock;
pub mod normalize;
pub mod service;
pub mod types;

pub use cache::{init_cache, ResponseCache};
pub use client::{WeatherClient, WeatherClientError};
pub use service::{load_render_model, ForecastError};
