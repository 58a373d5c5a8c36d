use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{Coordinates, error::LocationError};

use super::{LocationMethod, LocationProvider};

/// Resolves coordinates from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpLocationProvider {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: String,
}

impl IpLocationProvider {
    pub fn new(url: String) -> Self {
        Self { url, http: Client::new() }
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn resolve(&self) -> Result<Coordinates, LocationError> {
        let fail = |reason: String| LocationError::access(LocationMethod::Ip, reason);

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(fail(format!("service responded with status {status}")));
        }

        let parsed: IpInfoResponse =
            res.json().await.map_err(|e| fail(format!("unexpected response: {e}")))?;

        debug!(loc = %parsed.loc, "IP geolocation response");
        parse_loc(&parsed.loc).ok_or_else(|| fail(format!("malformed loc field '{}'", parsed.loc)))
    }
}

/// Parse a `"lat,lon"` pair.
fn parse_loc(loc: &str) -> Option<Coordinates> {
    let (lat, lon) = loc.split_once(',')?;
    let latitude = lat.trim().parse::<f64>().ok()?;
    let longitude = lon.trim().parse::<f64>().ok()?;

    if latitude.is_finite() && longitude.is_finite() {
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    }
}
