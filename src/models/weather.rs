use crate::error::{IrrigationError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A validated point on the globe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(IrrigationError::Location(format!(
                "latitude {} is outside -90..90",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(IrrigationError::Location(format!(
                "longitude {} is outside -180..180",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude as sent to the forecast API (4 decimal places)
    pub fn lat_param(&self) -> String {
        format!("{:.4}", self.latitude)
    }

    /// Longitude as sent to the forecast API (4 decimal places)
    pub fn lon_param(&self) -> String {
        format!("{:.4}", self.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat_param(), self.lon_param())
    }
}

/// Current conditions taken from the first forecast timeseries entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSample {
    pub coordinates: Coordinates,
    pub forecast_time: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    pub air_temperature_c: f64,
    pub relative_humidity_percent: f64,
    pub wind_speed_ms: f64,
    /// Next-hour precipitation, 0 when the forecast omits it
    pub precipitation_mm: f64,
}

/// The two scalars the scheduler consumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedClimate {
    pub et0_mm_day: f64,
    pub precipitation_mm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub sample: WeatherSample,
    pub climate: DerivedClimate,
}

impl WeatherReport {
    pub fn summary_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "Temperature",
                format!("{:.2} °C", self.sample.air_temperature_c),
            ),
            (
                "Relative Humidity",
                format!("{:.2} %", self.sample.relative_humidity_percent),
            ),
            ("Wind Speed", format!("{:.2} m/s", self.sample.wind_speed_ms)),
            (
                "Reference Evapotranspiration (ET₀)",
                format!("{:.2} mm/day", self.climate.et0_mm_day),
            ),
            (
                "Forecasted Precipitation",
                format!("{:.2} mm", self.climate.precipitation_mm),
            ),
        ]
    }
}
