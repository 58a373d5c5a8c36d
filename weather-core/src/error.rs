use std::path::PathBuf;

use thiserror::Error;

use crate::{location::LocationMethod, model::Coordinates};

/// A location provider could not be selected or could not produce coordinates.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The selected provider failed: network error, malformed response,
    /// no positioning fix or no geocoding match.
    #[error("Failed to get location by {method}: {reason}")]
    Access { method: LocationMethod, reason: String },

    /// The requested provider mode does not exist.
    #[error("Unknown location provider '{0}'. Supported providers: ip, gps, query (q).")]
    UnknownProvider(String),
}

impl LocationError {
    pub(crate) fn access(method: LocationMethod, reason: impl Into<String>) -> Self {
        Self::Access { method, reason: reason.into() }
    }
}

/// The weather backend could not produce a complete observation.
#[derive(Debug, Error)]
#[error("Unable to get weather data from {provider}: {reason}")]
pub struct WeatherServiceAccessError {
    pub provider: &'static str,
    pub reason: String,
}

/// Reading or writing the weather log store failed.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Weather log I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Weather log {} is not a valid JSON record list: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Terminal outcome of a failed pipeline run.
///
/// `Display` is the exact line shown to the user.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to get gps coordinates")]
    Location(#[source] LocationError),

    #[error("Failed to get weather data by {coords}")]
    Weather {
        coords: Coordinates,
        #[source]
        source: WeatherServiceAccessError,
    },

    #[error("Failed to print weather report")]
    Output(#[source] std::io::Error),

    #[error("Failed to save weather log")]
    Log(#[source] LogError),
}

impl PipelineError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
