use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use super::types::*;
use crate::utils::parse_timezone;

pub const NOW_MARKER: &str = "Now";
pub const TODAY_LABEL: &str = "Today";
pub const TOMORROW_LABEL: &str = "Tomorrow";
pub const DEFAULT_SYMBOL: &str = "cloudy";

/// Local hour at which night starts (inclusive).
pub const NIGHT_START_HOUR: u32 = 19;
/// Local hour at which day starts (inclusive).
pub const DAY_START_HOUR: u32 = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Carried across the timeseries while it is folded into display entries.
struct FoldState {
    timeseries: Vec<NormalizedForecastEntry>,
    grouped_by_day: GroupedForecast,
    now_assigned: bool,
    last_symbol: String,
}

impl FoldState {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            timeseries: Vec::with_capacity(capacity),
            grouped_by_day: GroupedForecast::new(),
            now_assigned: false,
            last_symbol: DEFAULT_SYMBOL.to_string(),
        }
    }

    fn push(mut self, entry: RawForecastEntry, tz: Tz, today: NaiveDate) -> Self {
        let local = entry.time.with_timezone(&tz);
        let day_label = day_label(local.date_naive(), today, &local);

        let display_time = if day_label == TODAY_LABEL && !self.now_assigned {
            self.now_assigned = true;
            NOW_MARKER.to_string()
        } else {
            local.format("%H:%M").to_string()
        };

        // Forward-fill: entries without a summary inherit the last known condition.
        let symbol = match entry.data.symbol_code() {
            Some(code) => {
                self.last_symbol = code.to_string();
                self.last_symbol.clone()
            }
            None => self.last_symbol.clone(),
        };

        let normalized = NormalizedForecastEntry {
            entry,
            display_time,
            day_label,
            symbol,
        };

        self.grouped_by_day
            .entry(normalized.day_label.clone())
            .or_default()
            .push(normalized.clone());
        self.timeseries.push(normalized);
        self
    }
}

/// Annotates an ascending timeseries for display and groups it by day.
///
/// Every local computation (clock time, calendar day, weekday name, night) uses
/// `timezone_id`. "Today" is the calendar day of `reference` in that timezone,
/// not on the server's clock.
pub fn normalize(
    timeseries: Vec<RawForecastEntry>,
    timezone_id: &str,
    reference: DateTime<Utc>,
) -> Result<NormalizedForecast, NormalizeError> {
    let tz = parse_timezone(timezone_id)
        .map_err(|_| NormalizeError::UnknownTimezone(timezone_id.to_string()))?;
    let local_reference = reference.with_timezone(&tz);
    let today = local_reference.date_naive();

    let capacity = timeseries.len();
    let state = timeseries
        .into_iter()
        .fold(FoldState::with_capacity(capacity), |state, entry| {
            state.push(entry, tz, today)
        });

    Ok(NormalizedForecast {
        timeseries: state.timeseries,
        grouped_by_day: state.grouped_by_day,
        is_night: is_night_hour(local_reference.hour()),
    })
}

fn day_label(date: NaiveDate, today: NaiveDate, local: &DateTime<Tz>) -> String {
    if date == today {
        TODAY_LABEL.to_string()
    } else if today.succ_opt() == Some(date) {
        TOMORROW_LABEL.to_string()
    } else {
        local.format("%A").to_string()
    }
}

pub fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < DAY_START_HOUR
}
