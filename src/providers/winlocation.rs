use std::time::Duration;

use chrono::Utc;
use tokio::process::Command;

use super::{parse_fix, poll_iterations};
use crate::location::Coordinate;

// GeoCoordinateWatcher poll loop, 250ms per iteration. Coordinates are
// written with the invariant culture so decimal-comma locales still produce
// `lat;lon` with decimal points. Prints nothing when permission is denied or
// no fix arrives, which parses to None below.
const WATCHER_SCRIPT: &str = r#"
Add-Type -AssemblyName System.Device
$invariant = [System.Globalization.CultureInfo]::InvariantCulture
$watcher = New-Object System.Device.Location.GeoCoordinateWatcher
$watcher.Start()
for ($i = 0; $i -lt {iterations}; $i++) {
    if ($watcher.Permission -eq 'Denied') { break }
    if ($watcher.Status -eq 'Ready') {
        $location = $watcher.Position.Location
        if (-not $location.IsUnknown) {
            Write-Output ($location.Latitude.ToString($invariant) + ";" + $location.Longitude.ToString($invariant))
        }
        break
    }
    Start-Sleep -Milliseconds 250
}
$watcher.Stop()
"#;

pub async fn acquire_fix(timeout: Duration, verbose: bool) -> Option<Coordinate> {
    let timeout = if timeout.is_zero() {
        Duration::from_secs(5)
    } else {
        timeout
    };
    if verbose {
        eprintln!("geo-doctor: requesting a Windows location fix");
    }

    // The poll loop gets the budget minus a startup allowance for assembly
    // load and watcher spin-up, so the whole acquisition stays within the
    // caller's timeout.
    let iterations = poll_iterations(timeout);
    let script = WATCHER_SCRIPT.replace("{iterations}", &iterations.to_string());
    let invocation = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()])
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, invocation).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            if verbose {
                eprintln!("geo-doctor: powershell invocation failed: {err}");
            }
            return None;
        }
        Err(_) => {
            if verbose {
                eprintln!("geo-doctor: timed out waiting for a location fix");
            }
            return None;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let (lat, lon) = parse_fix(&stdout)?;
    Some(Coordinate::new(lat, lon, "windows", Utc::now()))
}
