use super::calculations::reference_et0;
use crate::datasources::WeatherProvider;
use crate::error::Result;
use crate::models::{Coordinates, DerivedClimate, WeatherReport, WeatherSample};

/// Fetches current conditions and derives the ET₀/precipitation pair the
/// scheduler consumes
pub struct WeatherEstimator<P> {
    provider: P,
}

impl<P: WeatherProvider> WeatherEstimator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub async fn estimate(&self, coordinates: Coordinates) -> Result<WeatherReport> {
        let sample = match self.provider.fetch_current(coordinates).await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!("Failed to fetch weather for {}: {}", coordinates, e);
                return Err(e);
            }
        };

        let climate = derive_climate(&sample);
        tracing::info!(
            location = %coordinates,
            temp_c = sample.air_temperature_c,
            et0 = climate.et0_mm_day,
            precipitation = climate.precipitation_mm,
            "Weather estimate updated"
        );

        Ok(WeatherReport { sample, climate })
    }
}

pub fn derive_climate(sample: &WeatherSample) -> DerivedClimate {
    DerivedClimate {
        et0_mm_day: reference_et0(sample.air_temperature_c),
        precipitation_mm: sample.precipitation_mm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrrigationError;
    use chrono::Utc;

    struct FixedProvider {
        temperature_c: Option<f64>,
        precipitation_mm: f64,
    }

    impl WeatherProvider for FixedProvider {
        async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherSample> {
            let air_temperature_c = self.temperature_c.ok_or_else(|| {
                IrrigationError::DataSourceUnavailable("connection refused".into())
            })?;
            Ok(WeatherSample {
                coordinates,
                forecast_time: None,
                fetched_at: Utc::now(),
                air_temperature_c,
                relative_humidity_percent: 50.0,
                wind_speed_ms: 2.0,
                precipitation_mm: self.precipitation_mm,
            })
        }
    }

    fn point() -> Coordinates {
        Coordinates::new(41.5868, -93.625).unwrap()
    }

    #[tokio::test]
    async fn estimate_derives_climate() {
        let estimator = WeatherEstimator::new(FixedProvider {
            temperature_c: Some(25.0),
            precipitation_mm: 1.2,
        });
        let report = estimator.estimate(point()).await.unwrap();

        let expected = 0.0023 * 41.8 * 2f64.sqrt() * 0.082;
        assert!((report.climate.et0_mm_day - expected).abs() < 1e-9);
        assert_eq!(report.climate.precipitation_mm, 1.2);
        assert_eq!(report.sample.coordinates, point());
    }

    #[tokio::test]
    async fn fetch_failure_propagates() {
        let estimator = WeatherEstimator::new(FixedProvider {
            temperature_c: None,
            precipitation_mm: 0.0,
        });
        assert!(matches!(
            estimator.estimate(point()).await,
            Err(IrrigationError::DataSourceUnavailable(_))
        ));
    }
}
