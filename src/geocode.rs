use std::error::Error;
use std::time::Duration;

use serde::Deserialize;

use crate::location::Coordinate;

const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("geo-doctor/", env!("CARGO_PKG_VERSION"), " (diagnostic tool)");

pub const RESOLUTION_FAILED: &str = "Address resolution failed (API error).";

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeResult {
    Resolved { display_name: String },
    Unresolved { reason: String },
}

#[derive(Deserialize)]
struct ReversePayload {
    display_name: Option<String>,
}

/// One reverse-geocode attempt against Nominatim. Every failure mode, from
/// network errors to a payload without a display name, collapses into
/// `Unresolved` with a fixed reason; the caller still has the raw coordinate.
pub async fn resolve(fix: &Coordinate, verbose: bool) -> GeocodeResult {
    match request_display_name(fix).await {
        Ok(display_name) => GeocodeResult::Resolved { display_name },
        Err(err) => {
            if verbose {
                eprintln!("geo-doctor: reverse geocode failed: {err}");
            }
            GeocodeResult::Unresolved {
                reason: RESOLUTION_FAILED.to_string(),
            }
        }
    }
}

async fn request_display_name(fix: &Coordinate) -> Result<String, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let payload: ReversePayload = client
        .get(NOMINATIM_ENDPOINT)
        .query(&[
            ("format", "json".to_string()),
            ("lat", fix.latitude.to_string()),
            ("lon", fix.longitude.to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    payload.display_name.ok_or_else(|| "no display_name in response".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_with_display_name_parses() {
        let body = r#"{"place_id":123,"display_name":"1600 Amphitheatre Parkway, Mountain View, CA","lat":"37.42","lon":"-122.08"}"#;
        let payload: ReversePayload = serde_json::from_str(body).unwrap();
        assert_eq!(
            payload.display_name.as_deref(),
            Some("1600 Amphitheatre Parkway, Mountain View, CA")
        );
    }

    #[test]
    fn payload_without_display_name_is_none() {
        let body = r#"{"error":"Unable to geocode"}"#;
        let payload: ReversePayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.display_name, None);
    }
}
