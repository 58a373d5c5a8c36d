//! Core library for the `geoweather` CLI.
//!
//! This crate defines:
//! - Location providers (IP lookup, GeoClue positioning, address geocoding)
//! - The weather backend abstraction and its OpenWeatherMap implementation
//! - Shared domain models (coordinates, observations, condition categories)
//! - The console report format and the persistent JSON weather log
//! - The pipeline that ties them together, and its configuration
//!
//! It is used by the `geoweather` binary, but can also be reused by other binaries or services.

pub mod condition;
pub mod config;
pub mod error;
pub mod format;
pub mod location;
pub mod logger;
pub mod model;
pub mod pipeline;
pub mod weather;

pub use condition::ConditionCategory;
pub use config::{Config, LocationConfig, LogConfig, WeatherConfig};
pub use error::{LocationError, LogError, PipelineError, WeatherServiceAccessError};
pub use format::format_weather;
pub use location::{LocationMethod, LocationProvider, location_provider_from_config};
pub use logger::{JsonWeatherLogger, LogRecord, WeatherLogger};
pub use model::{Coordinates, WeatherObservation};
pub use pipeline::Pipeline;
pub use weather::{WeatherProvider, weather_provider_from_config};
