use crate::errors::AppError;
use crate::models::{StatsResponse, TrackResponse};
use crate::state::AppState;
use crate::tracker;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;
use std::net::SocketAddr;

pub async fn track(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TrackResponse>, AppError> {
    let payload = parse_body(&body)?;
    let forwarded_for = header_str(&headers, "x-forwarded-for");
    let user_agent = header_str(&headers, "user-agent").unwrap_or("");

    let response = tracker::track(
        &state,
        &addr.ip().to_string(),
        forwarded_for,
        user_agent,
        &payload,
    )
    .await?;
    Ok(Json(response))
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_visitors: state.store.count().await,
    })
}

/// An empty body counts as "no fields"; a body that is not valid JSON is a
/// request error and nothing gets written.
fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::internal(format!("invalid request body: {err}")))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_parses_to_empty_object() {
        assert_eq!(
            parse_body(&Bytes::new()).unwrap(),
            serde_json::json!({})
        );
        assert_eq!(
            parse_body(&Bytes::from_static(b"  \n")).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn invalid_json_body_is_rejected() {
        let err = parse_body(&Bytes::from_static(b"{not json")).unwrap_err();
        assert!(err.message.contains("invalid request body"));
    }
}
