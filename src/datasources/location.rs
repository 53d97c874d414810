use crate::config::LocationConfig;
use crate::error::{IrrigationError, Result};
use crate::models::Coordinates;

/// Resolves the field location: command-line coordinates win over the
/// configured ones
#[derive(Debug, Clone, Default)]
pub struct LocationResolver {
    latitude: Option<f64>,
    longitude: Option<f64>,
    configured: Option<LocationConfig>,
}

impl LocationResolver {
    pub fn new(configured: Option<LocationConfig>) -> Self {
        Self {
            latitude: None,
            longitude: None,
            configured,
        }
    }

    pub fn with_override(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn locate(&self) -> Result<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => return Coordinates::new(lat, lon),
            (None, None) => {}
            _ => {
                return Err(IrrigationError::Location(
                    "both --lat and --lon must be given".into(),
                ))
            }
        }

        match &self.configured {
            Some(loc) => Coordinates::new(loc.latitude, loc.longitude),
            None => Err(IrrigationError::Location(
                "location unavailable - pass --lat/--lon or set `location` in config.yaml".into(),
            )),
        }
    }
}
