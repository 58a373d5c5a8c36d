use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{Coordinates, error::LocationError};

use super::{LocationMethod, LocationProvider};

const AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Geocodes a free-text address through a Nominatim-compatible service.
#[derive(Debug, Clone)]
pub struct NominatimLocationProvider {
    base_url: String,
    address: Option<String>,
    http: Client,
}

/// Nominatim reports coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimLocationProvider {
    pub fn new(base_url: String, address: Option<String>) -> Self {
        Self { base_url, address, http: Client::new() }
    }
}

#[async_trait]
impl LocationProvider for NominatimLocationProvider {
    #[instrument(skip(self), fields(address = ?self.address))]
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let fail = |reason: String| LocationError::access(LocationMethod::Query, reason);

        let address = self
            .address
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| fail("no address given and no default query configured".into()))?;

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(url)
            .header(USER_AGENT, AGENT)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(fail(format!("geocoder responded with status {status}")));
        }

        let places: Vec<NominatimPlace> =
            res.json().await.map_err(|e| fail(format!("unexpected response: {e}")))?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| fail(format!("no match for '{address}'")))?;

        debug!(name = ?place.display_name, "geocoded address");

        let latitude =
            parse_axis(&place.lat).ok_or_else(|| fail(format!("bad latitude '{}'", place.lat)))?;
        let longitude =
            parse_axis(&place.lon).ok_or_else(|| fail(format!("bad longitude '{}'", place.lon)))?;

        Ok(Coordinates::new(latitude, longitude))
    }
}

fn parse_axis(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
