use async_trait::async_trait;
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::{Coordinates, error::LocationError};

use super::{LocationMethod, LocationProvider};

static LAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Latitude:\s*(-?\d+(?:\.\d+)?)").expect("valid latitude pattern"));
static LON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Longitude:\s*(-?\d+(?:\.\d+)?)").expect("valid longitude pattern")
});

/// Reads the device position from GeoClue through its `where-am-i` client.
#[derive(Debug, Clone)]
pub struct GeoclueLocationProvider {
    command: PathBuf,
    args: Vec<String>,
}

impl GeoclueLocationProvider {
    pub fn new(command: PathBuf, args: Vec<String>) -> Self {
        Self { command, args }
    }
}

#[async_trait]
impl LocationProvider for GeoclueLocationProvider {
    #[instrument(skip(self), fields(command = %self.command.display()))]
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let output = Command::new(&self.command)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| {
                LocationError::access(
                    LocationMethod::Gps,
                    format!("failed to run {}: {e}. Is geoclue installed?", self.command.display()),
                )
            })?;

        if !output.status.success() {
            return Err(LocationError::access(
                LocationMethod::Gps,
                format!(
                    "{} exited with {}: {}",
                    self.command.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(bytes = stdout.len(), "positioning output received");
        parse_fix(&stdout)
    }
}

/// Extract the first reported position.
///
/// A reading of exactly (0, 0) means the device has no fix.
fn parse_fix(stdout: &str) -> Result<Coordinates, LocationError> {
    let fail = |reason: &str| LocationError::access(LocationMethod::Gps, reason);

    let latitude = capture_f64(&LAT_RE, stdout).ok_or_else(|| fail("no latitude reported"))?;
    let longitude = capture_f64(&LON_RE, stdout).ok_or_else(|| fail("no longitude reported"))?;

    if latitude == 0.0 && longitude == 0.0 {
        return Err(fail("no positioning fix"));
    }

    Ok(Coordinates::new(latitude, longitude))
}

fn capture_f64(re: &Regex, haystack: &str) -> Option<f64> {
    re.captures(haystack)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Client object: /org/freedesktop/GeoClue2/Client/1\n\
        \n\
        New location:\n\
        Latitude:    55.755800°\n\
        Longitude:   37.617300°\n\
        Accuracy:    25000.000000 meters\n\
        Description: GeoIP\n";

    #[test]
    fn parses_where_am_i_output() {
        let coords = parse_fix(SAMPLE).expect("fix should parse");
        assert_eq!(coords, Coordinates::new(55.7558, 37.6173));
    }

    #[test]
    fn negative_values_are_kept() {
        let coords = parse_fix("Latitude: -33.92\nLongitude: -70.5\n").unwrap();
        assert_eq!(coords, Coordinates::new(-33.92, -70.5));
    }

    #[test]
    fn origin_reading_is_no_fix() {
        for out in ["Latitude: 0.0\nLongitude: 0.0\n", "Latitude: 0\nLongitude: -0.000\n"] {
            let err = parse_fix(out).unwrap_err();
            assert!(matches!(err, LocationError::Access { method: LocationMethod::Gps, .. }));
            assert!(err.to_string().contains("no positioning fix"));
        }
    }

    #[test]
    fn a_single_zero_axis_is_a_real_reading() {
        let coords = parse_fix("Latitude: 0.0\nLongitude: 32.5\n").unwrap();
        assert_eq!(coords, Coordinates::new(0.0, 32.5));
    }

    #[test]
    fn missing_values_are_access_errors() {
        assert!(parse_fix("").is_err());
        assert!(parse_fix("Latitude: 55.75\n").is_err());
    }

    #[tokio::test]
    async fn missing_command_is_access_error() {
        let provider =
            GeoclueLocationProvider::new(PathBuf::from("/nonexistent/where-am-i"), Vec::new());
        let err = provider.resolve().await.unwrap_err();
        assert!(matches!(err, LocationError::Access { method: LocationMethod::Gps, .. }));
    }
}
