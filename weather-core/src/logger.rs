//! Persistent weather log.
//!
//! The JSON backend keeps the whole history as one array and rewrites it on
//! every call. The rewrite is atomic (temp file + rename), so the store is a
//! valid array after every write, but nothing serializes concurrent writers:
//! two invocations racing on the same file can lose one record. Run a single
//! writer per store.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{WeatherObservation, error::LogError, format::TIME_FORMAT};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait WeatherLogger: Send + Sync + Debug {
    fn log(&self, obs: &WeatherObservation) -> Result<(), LogError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedWeather {
    pub location: String,
    pub temperature: i32,
    pub description: String,
    pub sunrise: String,
    pub sunset: String,
}

/// One persisted observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub date: String,
    pub weather: LoggedWeather,
}

impl LogRecord {
    pub fn new(obs: &WeatherObservation, logged_at: DateTime<Local>) -> Self {
        Self {
            date: logged_at.format(DATE_FORMAT).to_string(),
            weather: LoggedWeather {
                location: obs.location.clone(),
                temperature: obs.temperature,
                description: obs.description.name().to_string(),
                sunrise: obs.sunrise.format(TIME_FORMAT).to_string(),
                sunset: obs.sunset.format(TIME_FORMAT).to_string(),
            },
        }
    }
}

/// Weather log stored as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonWeatherLogger {
    path: PathBuf,
}

impl JsonWeatherLogger {
    /// Point the logger at `path`. The store is created on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the store as an empty array if it does not exist yet.
    ///
    /// A new store gets the process's default file mode. An existing store is left untouched.
    pub fn init(&self) -> Result<(), LogError> {
        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(mut file) => {
                info!(path = %self.path.display(), "creating weather log");
                file.write_all(b"[]").map_err(|source| self.io_error(source))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// All records, oldest first. A missing store has none.
    pub fn records(&self) -> Result<Vec<LogRecord>, LogError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&contents)
            .map_err(|source| LogError::Json { path: self.path.clone(), source })
    }

    fn append(&self, record: LogRecord) -> Result<(), LogError> {
        self.init()?;

        let mut records = self.records()?;
        records.push(record);
        self.write_records(&records)
    }

    /// Replace the store, keeping its permissions.
    fn write_records(&self, records: &[LogRecord]) -> Result<(), LogError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records
            .serialize(&mut ser)
            .map_err(|source| LogError::Json { path: self.path.clone(), source })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let permissions =
            fs::metadata(&self.path).map_err(|source| self.io_error(source))?.permissions();

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| self.io_error(source))?;
        tmp.write_all(&buf).map_err(|source| self.io_error(source))?;
        tmp.as_file().set_permissions(permissions).map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), records = records.len(), "weather log written");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io { path: self.path.clone(), source }
    }
}

impl WeatherLogger for JsonWeatherLogger {
    fn log(&self, obs: &WeatherObservation) -> Result<(), LogError> {
        self.append(LogRecord::new(obs, Local::now()))
    }
}
