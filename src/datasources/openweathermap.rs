use crate::config::OpenWeatherMapConfig;
use crate::error::{AgroSmartError, Result};
use crate::models::forecast::ForecastObservation;
use crate::models::region::Coordinates;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
    city: OwmCity,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    wind: OwmWind,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCity {
    name: String,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the 5-day/3-hour forecast for a set of coordinates, metric units.
    pub async fn fetch_forecast(&self, coords: &Coordinates) -> Result<Vec<ForecastObservation>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, coords.lat, coords.lon, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                AgroSmartError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgroSmartError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmForecastResponse = response.json().await.map_err(|e| {
            AgroSmartError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        debug!(
            "OpenWeatherMap resolved ({}, {}) to {}",
            coords.lat, coords.lon, owm_response.city.name
        );

        Ok(convert_response(owm_response))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self, coords: &Coordinates) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, coords.lat, coords.lon, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                AgroSmartError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

fn convert_response(response: OwmForecastResponse) -> Vec<ForecastObservation> {
    response.list.iter().map(convert_item).collect()
}

fn convert_item(item: &OwmForecastItem) -> ForecastObservation {
    let timestamp = DateTime::from_timestamp(item.dt, 0).unwrap_or_else(Utc::now);

    // A missing rain block means no precipitation was forecast for the slot
    let rain_3h_mm = item.rain.as_ref().map(|r| r.three_hour).unwrap_or(0.0);

    ForecastObservation {
        timestamp,
        temp_c: item.main.temp,
        wind_speed_ms: item.wind.speed,
        rain_3h_mm,
    }
}
