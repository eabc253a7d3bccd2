use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::{coordinate_key, round_to_decimals};

/// A coordinate pair rounded to 4 decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn rounded(lat: f64, lon: f64) -> Self {
        Self {
            lat: round_to_decimals(lat, 4),
            lon: round_to_decimals(lon, 4),
        }
    }

    pub fn cache_key(&self) -> String {
        coordinate_key(self.lat, self.lon)
    }
}

/// Upstream forecast document: `{ properties: { timeseries: [...] } }`.
/// Everything besides the timeseries is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload<E> {
    pub properties: ForecastProperties<E>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastProperties<E> {
    pub timeseries: Vec<E>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<E> ForecastPayload<E> {
    /// Swaps in a new timeseries, keeping the rest of the document, and hands back the old one.
    pub fn replace_timeseries<T>(self, timeseries: Vec<T>) -> (ForecastPayload<T>, Vec<E>) {
        let payload = ForecastPayload {
            properties: ForecastProperties {
                timeseries,
                extra: self.properties.extra,
            },
            extra: self.extra,
        };
        (payload, self.properties.timeseries)
    }
}

pub type RawForecast = ForecastPayload<RawForecastEntry>;
pub type NormalizedPayload = ForecastPayload<NormalizedForecastEntry>;

/// One point in the upstream timeseries. Unknown keys at every level are kept
/// so an entry serializes back exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecastEntry {
    pub time: DateTime<Utc>,
    pub data: EntryData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    /// Currently observed metrics, opaque here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_1_hours: Option<PeriodForecast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_6_hours: Option<PeriodForecast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_12_hours: Option<PeriodForecast>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntryData {
    /// First non-empty symbol code, short term before medium before long term.
    pub fn symbol_code(&self) -> Option<&str> {
        [&self.next_1_hours, &self.next_6_hours, &self.next_12_hours]
            .into_iter()
            .flatten()
            .find_map(|period| {
                period
                    .summary
                    .as_ref()?
                    .symbol_code
                    .as_deref()
                    .filter(|code| !code.is_empty())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodForecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<PeriodSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A timeseries entry annotated for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedForecastEntry {
    #[serde(flatten)]
    pub entry: RawForecastEntry,
    pub display_time: String,
    pub day_label: String,
    pub symbol: String,
}

/// Day label to entries, in first-seen label order.
pub type GroupedForecast = IndexMap<String, Vec<NormalizedForecastEntry>>;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedForecast {
    pub timeseries: Vec<NormalizedForecastEntry>,
    pub grouped_by_day: GroupedForecast,
    pub is_night: bool,
}

/// What the presentation layer receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub weather: NormalizedPayload,
    pub location: String,
    pub grouped_by_day: GroupedForecast,
    pub is_night: bool,
}

/// A single Nominatim search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub coordinates: Coordinates,
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimezoneResponse {
    pub timezone: String,
}
