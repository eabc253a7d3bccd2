use super::types::*;
use chrono::{DateTime, Duration, Timelike, Utc};
use serde_json::{json, Map, Value};

const SYMBOLS: [&str; 4] = ["clearsky_day", "partlycloudy_day", "cloudy", "lightrain"];

fn period(symbol: Option<&str>) -> Option<PeriodForecast> {
    symbol.map(|code| PeriodForecast {
        summary: Some(PeriodSummary {
            symbol_code: Some(code.to_string()),
            extra: Map::new(),
        }),
        extra: Map::new(),
    })
}

fn instant(time: DateTime<Utc>) -> Value {
    // Diurnal temperature curve peaking mid-afternoon UTC
    let phase = (time.hour() as f64 - 9.0) * std::f64::consts::PI / 12.0;
    let temp = 15.0 + 6.0 * phase.sin();
    json!({ "details": { "air_temperature": (temp * 10.0).round() / 10.0, "wind_speed": 3.2 } })
}

/// Entry with an optional short-term symbol.
pub fn entry_at(time: DateTime<Utc>, symbol: Option<&str>) -> RawForecastEntry {
    entry_with_tiers(time, symbol, None, None)
}

/// Entry with explicit short / medium / long term symbols.
pub fn entry_with_tiers(
    time: DateTime<Utc>,
    short: Option<&str>,
    medium: Option<&str>,
    long: Option<&str>,
) -> RawForecastEntry {
    RawForecastEntry {
        time,
        data: EntryData {
            instant: Some(instant(time)),
            next_1_hours: period(short),
            next_6_hours: period(medium),
            next_12_hours: period(long),
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

/// Evenly spaced series with gaps in the summaries: every third entry has none,
/// and some only carry a long-term symbol.
pub fn mock_timeseries(start: DateTime<Utc>, count: usize, step_hours: i64) -> Vec<RawForecastEntry> {
    (0..count)
        .map(|i| {
            let time = start + Duration::hours(i as i64 * step_hours);
            let symbol = SYMBOLS[i % SYMBOLS.len()];
            if i % 3 == 1 {
                entry_with_tiers(time, None, None, None)
            } else if i % 5 == 4 {
                entry_with_tiers(time, None, None, Some(symbol))
            } else {
                entry_at(time, Some(symbol))
            }
        })
        .collect()
}

pub fn mock_payload(timeseries: Vec<RawForecastEntry>) -> RawForecast {
    let mut properties_extra = Map::new();
    properties_extra.insert(
        "meta".to_string(),
        json!({ "updated_at": "2024-06-14T08:00:00Z", "units": { "air_temperature": "celsius" } }),
    );
    let mut extra = Map::new();
    extra.insert("type".to_string(), json!("Feature"));

    ForecastPayload {
        properties: ForecastProperties {
            timeseries,
            extra: properties_extra,
        },
        extra,
    }
}
