use crate::{
    Config, Coordinates, WeatherObservation, error::WeatherServiceAccessError,
    weather::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(
        &self,
        coords: Coordinates,
    ) -> Result<WeatherObservation, WeatherServiceAccessError>;
}

/// Construct the weather backend from config.
pub fn weather_provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    if !config.has_api_key() {
        tracing::warn!(
            "No weather API key configured. Hint: run `geoweather configure` or set GEOWEATHER_API_KEY."
        );
    }

    Box::new(OpenWeatherProvider::new(config.weather.clone()))
}
