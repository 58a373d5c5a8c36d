use chrono::{DateTime, Local};
use std::fmt;

use crate::condition::ConditionCategory;

/// A latitude/longitude pair produced by a location provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    // `{:?}` keeps a fractional digit on whole numbers (`55.0`, not `55`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coordinates(latitude={:?}, longitude={:?})",
            self.latitude, self.longitude
        )
    }
}

/// Current weather at a resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Whole degrees Celsius.
    pub temperature: i32,
    pub location: String,
    pub sunrise: DateTime<Local>,
    pub sunset: DateTime<Local>,
    pub description: ConditionCategory,
}
