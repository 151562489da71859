use serde::{Deserialize, Serialize};

/// Column headers of the visitor log, in persisted order.
pub const COLUMNS: [&str; 10] = [
    "Timestamp",
    "IP Address",
    "Country",
    "City",
    "Region",
    "Browser",
    "OS",
    "Device",
    "Referrer",
    "Page URL",
];

/// One tracked page view. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorRecord {
    pub timestamp: String,
    pub ip_address: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub browser: String,
    pub os: String,
    pub device: String,
    pub referrer: String,
    pub page_url: String,
}

impl VisitorRecord {
    /// Fields in the same order as [`COLUMNS`].
    pub fn to_row(&self) -> [String; 10] {
        [
            self.timestamp.clone(),
            self.ip_address.clone(),
            self.country.clone(),
            self.city.clone(),
            self.region.clone(),
            self.browser.clone(),
            self.os.clone(),
            self.device.clone(),
            self.referrer.clone(),
            self.page_url.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
    pub region: String,
}

impl GeoLocation {
    pub fn uniform(value: &str) -> Self {
        Self {
            country: value.to_string(),
            city: value.to_string(),
            region: value.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub status: String,
    pub message: String,
    pub visitor_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_visitors: u64,
}
