use crate::models::GeoLocation;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Geolocation lookup endpoint. Fixed; not part of the runtime configuration.
pub const IP_API_BASE: &str = "http://ip-api.com/json";

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// Best-effort IP geolocation via an external lookup service.
pub struct GeoResolver {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupPayload {
    #[serde(default)]
    status: String,
    country: Option<String>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
}

impl GeoResolver {
    /// The base URL is a constructor argument only so tests can point the
    /// resolver at a local endpoint; the binary always passes [`IP_API_BASE`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Resolves `ip` to a `{country, city, region}` triple.
    ///
    /// Loopback literals short-circuit to `Local` without a network call.
    /// Every failure mode (timeout, transport error, non-2xx, malformed or
    /// non-success payload) degrades to `Unknown`; errors never propagate.
    pub async fn resolve(&self, ip: &str) -> GeoLocation {
        if is_local(ip) {
            return GeoLocation::uniform("Local");
        }

        match self.lookup(ip).await {
            Ok(payload) if payload.status == "success" => GeoLocation {
                country: payload.country.unwrap_or_else(|| "Unknown".to_string()),
                city: payload.city.unwrap_or_else(|| "Unknown".to_string()),
                region: payload.region_name.unwrap_or_else(|| "Unknown".to_string()),
            },
            Ok(payload) => {
                debug!("geolocation lookup for {ip} returned status {:?}", payload.status);
                GeoLocation::uniform("Unknown")
            }
            Err(err) => {
                debug!("geolocation lookup for {ip} failed: {err}");
                GeoLocation::uniform("Unknown")
            }
        }
    }

    async fn lookup(&self, ip: &str) -> Result<LookupPayload, reqwest::Error> {
        self.client
            .get(format!("{}/{ip}", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

fn is_local(ip: &str) -> bool {
    matches!(ip, "127.0.0.1" | "::1" | "localhost")
}
