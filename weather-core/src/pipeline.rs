use std::io::Write;

use tracing::{info, warn};

use crate::{
    WeatherObservation, error::PipelineError, format::format_weather, location::LocationProvider,
    logger::WeatherLogger, weather::WeatherProvider,
};

/// Runs one location → weather → report → log pass.
#[derive(Debug)]
pub struct Pipeline {
    location: Box<dyn LocationProvider>,
    weather: Box<dyn WeatherProvider>,
    logger: Box<dyn WeatherLogger>,
}

impl Pipeline {
    pub fn new(
        location: Box<dyn LocationProvider>,
        weather: Box<dyn WeatherProvider>,
        logger: Box<dyn WeatherLogger>,
    ) -> Self {
        Self { location, weather, logger }
    }

    /// Resolve coordinates, fetch the weather, write the report to `out` and log it.
    ///
    /// Any failure ends the run. Nothing is logged unless the report was written.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<WeatherObservation, PipelineError> {
        let coords = self.location.resolve().await.map_err(|e| {
            warn!(error = %e, "location lookup failed");
            PipelineError::Location(e)
        })?;
        info!(%coords, "location resolved");

        let obs = self.weather.fetch(coords).await.map_err(|source| {
            warn!(error = %source, "weather lookup failed");
            PipelineError::Weather { coords, source }
        })?;

        writeln!(out, "{}", format_weather(&obs)).map_err(PipelineError::Output)?;

        self.logger.log(&obs).map_err(PipelineError::Log)?;

        Ok(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ConditionCategory, Coordinates,
        error::{LocationError, LogError, WeatherServiceAccessError},
        location::LocationMethod,
    };
    use async_trait::async_trait;
    use chrono::{Local, TimeZone};
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct FixedLocation(Option<Coordinates>);

    #[async_trait]
    impl LocationProvider for FixedLocation {
        async fn resolve(&self) -> Result<Coordinates, LocationError> {
            self.0.ok_or_else(|| LocationError::access(LocationMethod::Gps, "no positioning fix"))
        }
    }

    #[derive(Debug)]
    struct FixedWeather(Option<WeatherObservation>);

    #[async_trait]
    impl WeatherProvider for FixedWeather {
        async fn fetch(
            &self,
            _coords: Coordinates,
        ) -> Result<WeatherObservation, WeatherServiceAccessError> {
            self.0.clone().ok_or_else(|| WeatherServiceAccessError {
                provider: "stub",
                reason: "connection refused".into(),
            })
        }
    }

    #[derive(Debug, Default, Clone)]
    struct RecordingLogger(Arc<Mutex<Vec<WeatherObservation>>>);

    impl WeatherLogger for RecordingLogger {
        fn log(&self, obs: &WeatherObservation) -> Result<(), LogError> {
            self.0.lock().unwrap().push(obs.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct BrokenLogger;

    impl WeatherLogger for BrokenLogger {
        fn log(&self, _obs: &WeatherObservation) -> Result<(), LogError> {
            Err(LogError::Io {
                path: "weather_log.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    fn moscow() -> WeatherObservation {
        WeatherObservation {
            temperature: -3,
            location: "moscow".into(),
            sunrise: Local.with_ymd_and_hms(2024, 1, 15, 8, 15, 0).unwrap(),
            sunset: Local.with_ymd_and_hms(2024, 1, 15, 16, 40, 0).unwrap(),
            description: ConditionCategory::Snow,
        }
    }

    fn pipeline(
        coords: Option<Coordinates>,
        obs: Option<WeatherObservation>,
        logger: RecordingLogger,
    ) -> Pipeline {
        Pipeline::new(
            Box::new(FixedLocation(coords)),
            Box::new(FixedWeather(obs)),
            Box::new(logger),
        )
    }

    #[tokio::test]
    async fn successful_run_prints_report_and_logs() {
        let logger = RecordingLogger::default();
        let p = pipeline(Some(Coordinates::new(55.75, 37.62)), Some(moscow()), logger.clone());

        let mut out = Vec::new();
        let obs = p.run(&mut out).await.expect("pipeline should succeed");

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Location: Moscow\n\
             Temperature: -3°C\n\
             Weather condition: snow\n\
             Sunrise: 08:15\n\
             Sunset: 16:40\n"
        );
        assert_eq!(*logger.0.lock().unwrap(), vec![obs]);
    }

    #[tokio::test]
    async fn weather_failure_reports_coordinates_and_skips_log() {
        let logger = RecordingLogger::default();
        let p = pipeline(Some(Coordinates::new(55.75, 37.62)), None, logger.clone());

        let mut out = Vec::new();
        let err = p.run(&mut out).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to get weather data by Coordinates(latitude=55.75, longitude=37.62)"
        );
        assert_eq!(err.exit_code(), 1);
        assert!(out.is_empty());
        assert!(logger.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn location_failure_stops_before_weather() {
        let logger = RecordingLogger::default();
        let p = pipeline(None, Some(moscow()), logger.clone());

        let err = p.run(&mut Vec::new()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Location(_)));
        assert_eq!(err.to_string(), "Failed to get gps coordinates");
        assert_eq!(err.exit_code(), 1);
        assert!(logger.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn log_failure_is_fatal_after_report() {
        let p = Pipeline::new(
            Box::new(FixedLocation(Some(Coordinates::new(1.0, 2.0)))),
            Box::new(FixedWeather(Some(moscow()))),
            Box::new(BrokenLogger),
        );

        let mut out = Vec::new();
        let err = p.run(&mut out).await.unwrap_err();

        assert!(matches!(err, PipelineError::Log(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(String::from_utf8(out).unwrap().starts_with("Location: Moscow\n"));
    }
}
