use super::WeatherProvider;
use crate::config::WeatherConfig;
use crate::error::{IrrigationError, Result};
use crate::models::{Coordinates, WeatherSample};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reference point used by `test_connection` (Oslo)
const PROBE_LATITUDE: f64 = 59.9139;
const PROBE_LONGITUDE: f64 = 10.7522;

/// Client for the MET Norway Locationforecast API, either called directly or
/// through a forwarding proxy
pub struct MetNoClient {
    client: reqwest::Client,
    config: WeatherConfig,
}

// Locationforecast 2.0 response structures (only the fields we read)
#[derive(Debug, Deserialize)]
struct MetNoResponse {
    properties: MetNoProperties,
}

#[derive(Debug, Deserialize)]
struct MetNoProperties {
    timeseries: Vec<MetNoTimestep>,
}

#[derive(Debug, Deserialize)]
struct MetNoTimestep {
    #[serde(default)]
    time: Option<DateTime<Utc>>,
    data: MetNoData,
}

#[derive(Debug, Deserialize)]
struct MetNoData {
    instant: MetNoInstant,
    #[serde(default)]
    next_1_hours: Option<MetNoPeriod>,
}

#[derive(Debug, Deserialize)]
struct MetNoInstant {
    details: MetNoInstantDetails,
}

#[derive(Debug, Deserialize)]
struct MetNoInstantDetails {
    air_temperature: f64,
    relative_humidity: f64,
    wind_speed: f64,
}

#[derive(Debug, Deserialize)]
struct MetNoPeriod {
    #[serde(default)]
    details: Option<MetNoPeriodDetails>,
}

#[derive(Debug, Deserialize)]
struct MetNoPeriodDetails {
    #[serde(default)]
    precipitation_amount: Option<f64>,
}

/// Body POSTed to the forwarding proxy
#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    url: String,
    headers: ProxyHeaders<'a>,
}

#[derive(Debug, Serialize)]
struct ProxyHeaders<'a> {
    #[serde(rename = "User-Agent")]
    user_agent: &'a str,
}

impl MetNoClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn uses_proxy(&self) -> bool {
        self.config.proxy_url.is_some()
    }

    /// Forecast endpoint for a point, coordinates at 4 decimal places
    pub fn forecast_url(&self, coordinates: &Coordinates) -> String {
        format!(
            "{}?lat={}&lon={}",
            self.config.forecast_url,
            coordinates.lat_param(),
            coordinates.lon_param()
        )
    }

    fn proxy_request(&self, coordinates: &Coordinates) -> ProxyRequest<'_> {
        ProxyRequest {
            url: self.forecast_url(coordinates),
            headers: ProxyHeaders {
                user_agent: &self.config.user_agent,
            },
        }
    }

    async fn send(&self, coordinates: &Coordinates) -> Result<reqwest::Response> {
        let request = match &self.config.proxy_url {
            Some(proxy_url) => {
                tracing::debug!("Requesting forecast via proxy {}", proxy_url);
                self.client
                    .post(proxy_url)
                    .json(&self.proxy_request(coordinates))
            }
            None => self
                .client
                .get(self.forecast_url(coordinates))
                .header(reqwest::header::USER_AGENT, &self.config.user_agent),
        };

        request
            .send()
            .await
            .map_err(|e| IrrigationError::DataSourceUnavailable(format!("MET Norway: {}", e)))
    }

    /// Test connection to the forecast API (or proxy)
    pub async fn test_connection(&self) -> Result<bool> {
        let probe = Coordinates::new(PROBE_LATITUDE, PROBE_LONGITUDE)?;
        let response = self.send(&probe).await?;
        Ok(response.status().is_success())
    }
}

impl WeatherProvider for MetNoClient {
    async fn fetch_current(&self, coordinates: Coordinates) -> Result<WeatherSample> {
        let response = self.send(&coordinates).await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IrrigationError::DataSourceUnavailable(format!(
                "MET Norway returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IrrigationError::DataSourceUnavailable(format!("MET Norway: {}", e)))?;

        parse_forecast(&body, coordinates)
    }
}

/// Extract current conditions from the first timeseries entry
fn parse_forecast(body: &str, coordinates: Coordinates) -> Result<WeatherSample> {
    let response: MetNoResponse = serde_json::from_str(body).map_err(|e| {
        IrrigationError::DataSourceUnavailable(format!(
            "Failed to parse MET Norway response: {}",
            e
        ))
    })?;

    let current = response.properties.timeseries.into_iter().next().ok_or_else(|| {
        IrrigationError::DataSourceUnavailable("MET Norway returned an empty timeseries".into())
    })?;

    let details = current.data.instant.details;
    let precipitation_mm = current
        .data
        .next_1_hours
        .and_then(|p| p.details)
        .and_then(|d| d.precipitation_amount)
        .unwrap_or(0.0);

    Ok(WeatherSample {
        coordinates,
        forecast_time: current.time,
        fetched_at: Utc::now(),
        air_temperature_c: details.air_temperature,
        relative_humidity_percent: details.relative_humidity,
        wind_speed_ms: details.wind_speed,
        precipitation_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> WeatherConfig {
        WeatherConfig {
            proxy_url: Some("https://proxy.example.com/proxy".into()),
            user_agent: "irrisched-test/1.0 (test@example.com)".into(),
            ..WeatherConfig::default()
        }
    }

    fn oslo() -> Coordinates {
        Coordinates::new(59.91387, 10.75228).unwrap()
    }

    const FORECAST: &str = r#"{
        "type": "Feature",
        "properties": {
            "meta": { "updated_at": "2024-06-01T10:00:00Z" },
            "timeseries": [
                {
                    "time": "2024-06-01T10:00:00Z",
                    "data": {
                        "instant": { "details": {
                            "air_temperature": 25.0,
                            "relative_humidity": 61.3,
                            "wind_speed": 3.4,
                            "air_pressure_at_sea_level": 1013.2
                        } },
                        "next_1_hours": {
                            "summary": { "symbol_code": "rain" },
                            "details": { "precipitation_amount": 1.6 }
                        }
                    }
                },
                {
                    "time": "2024-06-01T11:00:00Z",
                    "data": {
                        "instant": { "details": {
                            "air_temperature": 27.0,
                            "relative_humidity": 55.0,
                            "wind_speed": 2.0
                        } }
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn forecast_url_uses_four_decimals() {
        let client = MetNoClient::new(sample_config()).unwrap();
        assert_eq!(
            client.forecast_url(&oslo()),
            "https://api.met.no/weatherapi/locationforecast/2.0/compact?lat=59.9139&lon=10.7523"
        );
        assert!(client.uses_proxy());
    }

    #[test]
    fn proxy_body_shape() {
        let client = MetNoClient::new(sample_config()).unwrap();
        let body = serde_json::to_value(client.proxy_request(&oslo())).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "url": "https://api.met.no/weatherapi/locationforecast/2.0/compact?lat=59.9139&lon=10.7523",
                "headers": { "User-Agent": "irrisched-test/1.0 (test@example.com)" }
            })
        );
    }

    #[test]
    fn parse_uses_first_timeseries_entry() {
        let sample = parse_forecast(FORECAST, oslo()).unwrap();
        assert_eq!(sample.air_temperature_c, 25.0);
        assert_eq!(sample.relative_humidity_percent, 61.3);
        assert_eq!(sample.wind_speed_ms, 3.4);
        assert_eq!(sample.precipitation_mm, 1.6);
        assert_eq!(
            sample.forecast_time.unwrap().to_rfc3339(),
            "2024-06-01T10:00:00+00:00"
        );
    }

    #[test]
    fn parse_without_next_hour_defaults_precipitation() {
        let body = r#"{"properties":{"timeseries":[{"data":{"instant":{"details":
            {"air_temperature":12.5,"relative_humidity":80.0,"wind_speed":1.0}}}}]}}"#;
        let sample = parse_forecast(body, oslo()).unwrap();
        assert_eq!(sample.precipitation_mm, 0.0);
        assert!(sample.forecast_time.is_none());

        let body = r#"{"properties":{"timeseries":[{"data":{"instant":{"details":
            {"air_temperature":12.5,"relative_humidity":80.0,"wind_speed":1.0}},
            "next_1_hours":{"summary":{"symbol_code":"cloudy"}}}}]}}"#;
        assert_eq!(parse_forecast(body, oslo()).unwrap().precipitation_mm, 0.0);
    }

    #[test]
    fn parse_empty_timeseries_fails() {
        let body = r#"{"properties":{"timeseries":[]}}"#;
        assert!(matches!(
            parse_forecast(body, oslo()),
            Err(IrrigationError::DataSourceUnavailable(_))
        ));
    }

    #[test]
    fn parse_missing_temperature_fails() {
        let body = r#"{"properties":{"timeseries":[{"data":{"instant":{"details":
            {"relative_humidity":80.0,"wind_speed":1.0}}}}]}}"#;
        assert!(matches!(
            parse_forecast(body, oslo()),
            Err(IrrigationError::DataSourceUnavailable(_))
        ));
        assert!(parse_forecast("<html>Bad Gateway</html>", oslo()).is_err());
    }
}
