use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Settings for the location providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// IP geolocation endpoint returning JSON with a `"loc": "lat,lon"` field.
    pub ip_url: String,

    /// Base URL of a Nominatim-compatible geocoder.
    pub geocoder_url: String,

    /// Address used by query mode when no address is given on the command line.
    pub default_query: Option<String>,

    /// GeoClue client used by gps mode.
    pub gps_command: PathBuf,
    pub gps_args: Vec<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            ip_url: "https://ipinfo.io/json".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            default_query: None,
            gps_command: PathBuf::from("/usr/lib/geoclue-2.0/demos/where-am-i"),
            gps_args: vec!["-t".to_string(), "10".to_string()],
        }
    }
}

/// Settings for the weather backend.
///
/// Example TOML:
/// [weather]
/// api_key = "..."
/// language = "ru"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub url: String,
    pub api_key: String,
    pub units: String,
    pub language: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            units: "metric".to_string(),
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// JSON weather log, relative paths resolve against the working directory.
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { file: PathBuf::from("weather_log.json") }
    }
}

/// Top-level configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub weather: WeatherConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() { Self::read(&path)? } else { Self::default() };

        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Load config from an explicit file, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::read(path)?;
        cfg.apply_overrides(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Override individual settings from `GEOWEATHER_*` variables.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GEOWEATHER_IP_URL") {
            self.location.ip_url = v;
        }
        if let Some(v) = lookup("GEOWEATHER_GEOCODER_URL") {
            self.location.geocoder_url = v;
        }
        if let Some(v) = lookup("GEOWEATHER_DEFAULT_QUERY") {
            self.location.default_query = Some(v);
        }
        if let Some(v) = lookup("GEOWEATHER_API_URL") {
            self.weather.url = v;
        }
        if let Some(v) = lookup("GEOWEATHER_API_KEY") {
            self.weather.api_key = v;
        }
        if let Some(v) = lookup("GEOWEATHER_UNITS") {
            self.weather.units = v;
        }
        if let Some(v) = lookup("GEOWEATHER_LANGUAGE") {
            self.weather.language = v;
        }
        if let Some(v) = lookup("GEOWEATHER_LOG_FILE") {
            self.log.file = PathBuf::from(v);
        }
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn has_api_key(&self) -> bool {
        !self.weather.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let cfg: Config = toml::from_str(
            r#"
            [weather]
            api_key = "KEY"
            language = "ru"
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.weather.api_key, "KEY");
        assert_eq!(cfg.weather.language, "ru");
        assert_eq!(cfg.weather.units, "metric");
        assert_eq!(cfg.location, LocationConfig::default());
        assert_eq!(cfg.log.file, PathBuf::from("weather_log.json"));
    }

    #[test]
    fn overrides_replace_only_present_keys() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GEOWEATHER_API_KEY", "FROM_ENV"),
            ("GEOWEATHER_DEFAULT_QUERY", "Moscow"),
            ("GEOWEATHER_LOG_FILE", "/tmp/log.json"),
        ]);

        let mut cfg = Config::default();
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.weather.api_key, "FROM_ENV");
        assert_eq!(cfg.location.default_query.as_deref(), Some("Moscow"));
        assert_eq!(cfg.log.file, PathBuf::from("/tmp/log.json"));
        assert_eq!(cfg.weather.url, WeatherConfig::default().url);
        assert!(cfg.has_api_key());
    }

    #[test]
    fn save_then_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.weather.api_key = "KEY".into();
        cfg.location.default_query = Some("Saint Petersburg".into());
        cfg.save_to(&path).expect("save should succeed");

        let loaded = Config::read(&path).expect("load should succeed");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn default_config_has_no_api_key() {
        assert!(!Config::default().has_api_key());
    }
}
