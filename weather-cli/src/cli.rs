use std::{io, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use geoweather_core::{
    Config, JsonWeatherLogger, LocationMethod, Pipeline, PipelineError,
    location_provider_from_config, weather_provider_from_config,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "geoweather",
    version,
    about = "Current weather for wherever you are",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Read configuration from this file instead of the platform config dir.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Location method: ip (default), gps, or query/q. Leading dashes are ignored.
    /// In query mode the remaining words form the address.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "MODE [ADDRESS]...")]
    pub args: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the weather API key and defaults.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Some(Command::Configure) => {
                configure(self.config.as_deref())?;
                Ok(ExitCode::SUCCESS)
            }
            None => {
                let config = load_config(self.config.as_deref())?;
                show(&config, &self.args).await
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn show(config: &Config, args: &[String]) -> anyhow::Result<ExitCode> {
    let (mode, rest) = match args.split_first() {
        Some((mode, rest)) => (Some(mode.as_str()), rest),
        None => (None, &[][..]),
    };

    let method = match LocationMethod::from_arg(mode) {
        Ok(method) => method,
        Err(e) => return Ok(report_failure(&PipelineError::Location(e))),
    };
    debug!(%method, "location method selected");

    let logger = JsonWeatherLogger::new(&config.log.file);

    let pipeline = Pipeline::new(
        location_provider_from_config(method, config, rest),
        weather_provider_from_config(config),
        Box::new(logger),
    );

    let mut stdout = io::stdout().lock();
    match pipeline.run(&mut stdout).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => Ok(report_failure(&e)),
    }
}

fn report_failure(err: &PipelineError) -> ExitCode {
    debug!(error = ?err, "pipeline failed");
    println!("{err}");
    ExitCode::from(err.exit_code())
}

fn configure(path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let mut config = load_config(path).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, starting from defaults: {e:#}");
        Config::default()
    });

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.weather.api_key = api_key.trim().to_string();
    }

    let default_query = Text::new("Default address for query mode (empty for none):")
        .with_default(config.location.default_query.as_deref().unwrap_or_default())
        .prompt()
        .context("Failed to read default address")?;
    config.location.default_query =
        Some(default_query.trim().to_string()).filter(|q| !q.is_empty());

    let units = Select::new("Units:", vec!["metric", "imperial", "standard"])
        .prompt()
        .context("Failed to read units")?;
    config.weather.units = units.to_string();

    config.weather.language = Text::new("Response language:")
        .with_default(&config.weather.language)
        .prompt()
        .context("Failed to read language")?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };
    println!("Configuration saved to {}", saved_to.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_default_mode() {
        let cli = Cli::try_parse_from(["geoweather"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.args.is_empty());
    }

    #[test]
    fn dashed_mode_is_kept_as_a_value() {
        let cli = Cli::try_parse_from(["geoweather", "--gps"]).unwrap();
        assert_eq!(cli.args, vec!["--gps"]);
        assert_eq!(LocationMethod::from_arg(Some(cli.args[0].as_str())).unwrap(), LocationMethod::Gps);
    }

    #[test]
    fn query_words_follow_the_mode() {
        let cli = Cli::try_parse_from(["geoweather", "q", "Moscow", "Tverskaya 1"]).unwrap();
        assert_eq!(cli.args, vec!["q", "Moscow", "Tverskaya 1"]);
    }

    #[test]
    fn configure_is_a_subcommand() {
        let cli = Cli::try_parse_from(["geoweather", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }

    #[test]
    fn config_flag_is_accepted() {
        let cli = Cli::try_parse_from(["geoweather", "--config", "/tmp/c.toml", "ip"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(cli.args, vec!["ip"]);
    }
}
