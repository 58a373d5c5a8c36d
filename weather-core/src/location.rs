use crate::{
    Config, Coordinates,
    error::LocationError,
    location::{gps::GeoclueLocationProvider, ip::IpLocationProvider, query::NominatimLocationProvider},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod gps;
pub mod ip;
pub mod query;

/// How the user's coordinates are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocationMethod {
    #[default]
    Ip,
    Gps,
    Query,
}

impl LocationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationMethod::Ip => "ip",
            LocationMethod::Gps => "gps",
            LocationMethod::Query => "query",
        }
    }

    pub const fn all() -> &'static [LocationMethod] {
        &[LocationMethod::Ip, LocationMethod::Gps, LocationMethod::Query]
    }

    /// Select a method from the first command-line token.
    ///
    /// No token means IP lookup. Otherwise one or two leading dashes are
    /// stripped and the rest is matched case-insensitively.
    pub fn from_arg(arg: Option<&str>) -> Result<Self, LocationError> {
        let Some(arg) = arg else {
            return Ok(LocationMethod::Ip);
        };

        let option = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')).unwrap_or(arg);

        match option.to_uppercase().as_str() {
            "IP" => Ok(LocationMethod::Ip),
            "GPS" => Ok(LocationMethod::Gps),
            "QUERY" | "Q" => Ok(LocationMethod::Query),
            _ => Err(LocationError::UnknownProvider(arg.to_string())),
        }
    }
}

impl std::fmt::Display for LocationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn resolve(&self) -> Result<Coordinates, LocationError>;
}

/// Construct the location provider for `method`.
///
/// `query_args` are the extra command-line tokens; they only matter for
/// query mode, where they are joined with commas into the address.
pub fn location_provider_from_config(
    method: LocationMethod,
    config: &Config,
    query_args: &[String],
) -> Box<dyn LocationProvider> {
    let location = &config.location;

    match method {
        LocationMethod::Ip => Box::new(IpLocationProvider::new(location.ip_url.clone())),
        LocationMethod::Gps => Box::new(GeoclueLocationProvider::new(
            location.gps_command.clone(),
            location.gps_args.clone(),
        )),
        LocationMethod::Query => {
            let address = if query_args.is_empty() {
                location.default_query.clone()
            } else {
                Some(query_args.join(","))
            };
            Box::new(NominatimLocationProvider::new(location.geocoder_url.clone(), address))
        }
    }
}
