use chrono::{DateTime, Duration, Utc};
use moka::future::Cache;
use std::sync::Arc;

use super::types::{Coordinates, RenderModel};

/// Records older than this are never served.
pub const FORECAST_TTL_MINUTES: i64 = 10;

#[derive(Clone, Debug)]
pub struct CacheRecord {
    pub render_model: Arc<RenderModel>,
    pub stored_at: DateTime<Utc>,
}

/// Render models keyed by rounded coordinates.
///
/// Expiry is checked on lookup against `stored_at`; expired records stay in
/// memory until the same coordinates are stored again. Concurrent misses for
/// one key both store, and the last write wins.
#[derive(Clone)]
pub struct ResponseCache {
    records: Cache<String, CacheRecord>,
    ttl: Duration,
}

pub fn init_cache() -> ResponseCache {
    ResponseCache {
        // No capacity bound and no moka-side expiry.
        records: Cache::builder().build(),
        ttl: Duration::minutes(FORECAST_TTL_MINUTES),
    }
}

impl ResponseCache {
    pub async fn get(&self, coords: Coordinates, now: DateTime<Utc>) -> Option<CacheRecord> {
        let key = coords.cache_key();
        let record = self.records.get(&key).await?;
        if now - record.stored_at >= self.ttl {
            tracing::debug!("Cache record for {} expired at {}", key, record.stored_at + self.ttl);
            return None;
        }
        Some(record)
    }

    pub async fn put(&self, coords: Coordinates, render_model: Arc<RenderModel>, now: DateTime<Utc>) {
        self.records
            .insert(
                coords.cache_key(),
                CacheRecord {
                    render_model,
                    stored_at: now,
                },
            )
            .await;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn entry_count(&self) -> u64 {
        self.records.entry_count()
    }
}
