use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    condition::ConditionCategory, config::WeatherConfig, error::WeatherServiceAccessError,
    model::{Coordinates, WeatherObservation},
};

use super::WeatherProvider;

const PROVIDER: &str = "openweather";

/// OpenWeatherMap current-weather backend.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: WeatherConfig,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: WeatherConfig) -> Self {
        Self { config, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    sys: OwSys,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherObservation, WeatherServiceAccessError> {
        let res = self
            .http
            .get(&self.config.url)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", self.config.api_key.clone()),
                ("units", self.config.units.clone()),
                ("lang", self.config.language.clone()),
            ])
            .send()
            .await
            .map_err(|e| access_error(format!("request failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| access_error(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(access_error(format!(
                "request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| access_error(format!("failed to parse response JSON: {e}")))?;

        debug!(location = %parsed.name, temp = parsed.main.temp, "weather response");
        observation_from_response(parsed)
    }
}

fn observation_from_response(
    parsed: OwCurrentResponse,
) -> Result<WeatherObservation, WeatherServiceAccessError> {
    let code = parsed
        .weather
        .first()
        .map(|w| w.main.to_uppercase())
        .ok_or_else(|| access_error("response contained no weather conditions".into()))?;

    if !parsed.main.temp.is_finite() {
        return Err(access_error(format!("invalid temperature {}", parsed.main.temp)));
    }

    Ok(WeatherObservation {
        temperature: parsed.main.temp.round_ties_even() as i32,
        location: parsed.name,
        sunrise: unix_to_local(parsed.sys.sunrise)?,
        sunset: unix_to_local(parsed.sys.sunset)?,
        description: ConditionCategory::from_code(&code),
    })
}

fn access_error(reason: String) -> WeatherServiceAccessError {
    WeatherServiceAccessError { provider: PROVIDER, reason }
}

fn unix_to_local(ts: i64) -> Result<DateTime<Local>, WeatherServiceAccessError> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| access_error(format!("timestamp {ts} out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
