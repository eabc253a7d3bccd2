use chrono::{DateTime, Utc};
use serde::Serialize;

/// Validate latitude and longitude coordinates
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("Invalid latitude: {}. Must be between -90 and 90", lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("Invalid longitude: {}. Must be between -180 and 180", lon));
    }
    Ok(())
}

/// Round to specified decimal places
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let multiplier = 10_f64.powi(decimals as i32);
    // Adding 0.0 turns -0.0 into 0.0 so keys never read "-0.0000".
    (value * multiplier).round() / multiplier + 0.0
}

/// Parse an IANA timezone identifier
pub fn parse_timezone(tz_str: &str) -> Result<chrono_tz::Tz, String> {
    tz_str
        .parse::<chrono_tz::Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Cache key for a coordinate pair, fixed at 4 decimal places
pub fn coordinate_key(lat: f64, lon: f64) -> String {
    format!("{:.4},{:.4}", round_to_decimals(lat, 4), round_to_decimals(lon, 4))
}

/// Error response helper
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            code: code.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(0.0, 0.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, 181.0).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to_decimals(59.913868, 4), 59.9139);
        assert_eq!(round_to_decimals(10.752245, 4), 10.7522);
        assert_eq!(round_to_decimals(-0.00001, 4).to_string(), "0");
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Oslo"), Ok(chrono_tz::Europe::Oslo));
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_coordinate_key() {
        assert_eq!(coordinate_key(59.913868, 10.752245), "59.9139,10.7522");
        assert_eq!(coordinate_key(59.9139, 10.7522), "59.9139,10.7522");
        assert_eq!(coordinate_key(-0.00001, 0.0), "0.0000,0.0000");
        assert_eq!(coordinate_key(-33.8688, 151.2093), "-33.8688,151.2093");
    }
}
