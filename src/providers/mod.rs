use std::error::Error;
use std::time::Duration;

use chrono::Utc;

use crate::location::Coordinate;

#[cfg(windows)]
pub mod winlocation;

#[cfg(not(windows))]
pub mod winlocation {
    use crate::location::Coordinate;
    use std::time::Duration;

    pub async fn acquire_fix(_timeout: Duration, verbose: bool) -> Option<Coordinate> {
        if verbose {
            eprintln!("geo-doctor: the platform location provider requires Windows; skipping");
        }
        None
    }
}

pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(250);
pub(crate) const STARTUP_GRACE: Duration = Duration::from_secs(2);

/// Primary/fallback acquisition: the platform provider first, then an
/// IP-based estimate. Both failing means the coordinate is simply unknown,
/// never an error.
pub async fn acquire(timeout: Duration, verbose: bool) -> Option<Coordinate> {
    if let Some(fix) = winlocation::acquire_fix(timeout, verbose).await {
        return Some(fix);
    }
    if verbose {
        eprintln!("geo-doctor: no platform fix, falling back to IP-based estimation");
    }
    match ip_estimate().await {
        Ok(fix) => Some(fix),
        Err(err) => {
            if verbose {
                eprintln!("geo-doctor: IP-based estimation failed: {err}");
            }
            None
        }
    }
}

/// Poll iterations that fit the acquisition budget once process startup is
/// set aside, so the whole acquisition finishes within the caller's timeout.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn poll_iterations(timeout: Duration) -> u128 {
    let poll_budget = timeout.saturating_sub(STARTUP_GRACE).max(POLL_INTERVAL);
    (poll_budget.as_millis() / POLL_INTERVAL.as_millis()).max(1)
}

/// Extracts a `lat;lon` fix line. Coordinates are emitted in invariant
/// format (decimal point), so anything that does not parse as two floats is
/// no fix.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn parse_fix(output: &str) -> Option<(f64, f64)> {
    let line = output.lines().map(str::trim).find(|l| l.contains(';'))?;
    let (lat, lon) = line.split_once(';')?;
    Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
}

async fn ip_estimate() -> Result<Coordinate, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let resp: serde_json::Value = client
        .get("http://ip-api.com/json")
        .send()
        .await?
        .json()
        .await?;
    let lat = resp["lat"].as_f64().ok_or("Invalid latitude")?;
    let lon = resp["lon"].as_f64().ok_or("Invalid longitude")?;
    Ok(Coordinate::new(lat, lon, "ip", Utc::now()))
}
