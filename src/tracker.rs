use crate::errors::AppError;
use crate::models::{GeoLocation, TrackResponse, VisitorRecord};
use crate::state::AppState;
use crate::user_agent::ClientInfo;
use chrono::Local;
use serde_json::Value;
use tracing::info;

/// Handles one page-view event: enrich, assemble the record, append it.
pub async fn track(
    state: &AppState,
    remote_addr: &str,
    forwarded_for: Option<&str>,
    user_agent: &str,
    body: &Value,
) -> Result<TrackResponse, AppError> {
    let ip = effective_ip(forwarded_for, remote_addr);
    info!("new visitor from {ip}");

    let location = state.geo.resolve(&ip).await;
    let client = ClientInfo::from_user_agent(user_agent);
    let record = build_record(ip, location, client, body);

    let visitor_count = state.store.append(&record).await?;
    Ok(TrackResponse {
        status: "success".to_string(),
        message: "Visitor tracked successfully".to_string(),
        visitor_count,
    })
}

/// First comma-separated token of `X-Forwarded-For` when present, else the
/// direct connection address.
pub fn effective_ip(forwarded_for: Option<&str>, remote_addr: &str) -> String {
    forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .unwrap_or(remote_addr)
        .to_string()
}

fn build_record(ip: String, location: GeoLocation, client: ClientInfo, body: &Value) -> VisitorRecord {
    VisitorRecord {
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        ip_address: ip,
        country: location.country,
        city: location.city,
        region: location.region,
        browser: client.browser(),
        os: client.os(),
        device: client.device_family,
        referrer: body_field(body, "referrer", "Direct"),
        page_url: body_field(body, "page_url", "Unknown"),
    }
}

/// Missing fields, non-object bodies and wrong-typed values all count as
/// "field absent" and take the default.
fn body_field(body: &Value, field: &str, default: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}
