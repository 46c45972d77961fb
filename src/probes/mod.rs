use serde::Serialize;

pub const LOCATION_POLICY_KEY: &str =
    r"HKEY_LOCAL_MACHINE\SOFTWARE\Policies\Microsoft\Windows\LocationAndSensors";
pub const APP_PRIVACY_KEY: &str =
    r"HKEY_LOCAL_MACHINE\SOFTWARE\Policies\Microsoft\Windows\AppPrivacy";

/// One immutable capture of the OS policy and radio state, taken at startup.
/// Probe failures never surface here: each field falls back to the default
/// that keeps the diagnostic running.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EnvironmentSnapshot {
    pub location_policy_present: bool,
    pub location_disable_value: Option<u32>,
    pub app_access_present: bool,
    pub app_access_value: Option<u32>,
    pub wifi_radio_on: bool,
    pub visible_network_count: usize,
    pub airplane_mode_on: bool,
}

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub async fn capture(verbose: bool) -> EnvironmentSnapshot {
    windows::capture(verbose).await
}

#[cfg(not(windows))]
pub async fn capture(verbose: bool) -> EnvironmentSnapshot {
    if verbose {
        eprintln!("geo-doctor: environment probes require Windows; reporting defaults");
    }
    EnvironmentSnapshot {
        location_policy_present: false,
        location_disable_value: None,
        app_access_present: false,
        app_access_value: None,
        wifi_radio_on: false,
        visible_network_count: 0,
        airplane_mode_on: false,
    }
}

/// Looks for the `Software ... On` indicator that `netsh wlan show interfaces`
/// prints under its `Radio status` section. Anything else, including output
/// that lacks the section entirely, reads as radio off.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn radio_software_on(interfaces: &str) -> bool {
    let lines: Vec<&str> = interfaces.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if !line.contains("Radio status") {
            continue;
        }
        for detail in lines.iter().skip(i + 1).take(10) {
            let detail = detail.trim();
            if !detail.to_lowercase().starts_with("software") {
                continue;
            }
            let state = match detail.split_once(':') {
                Some((_, rest)) => rest.trim(),
                None => detail
                    .split_once(char::is_whitespace)
                    .map(|(_, rest)| rest.trim())
                    .unwrap_or(""),
            };
            return state == "On";
        }
        break;
    }
    false
}

/// Counts `SSID n :` header lines in `netsh wlan show networks` output.
/// Anchored to the start of the line so `BSSID` entries do not inflate the
/// count.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn visible_network_count(networks: &str) -> usize {
    networks
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            line.starts_with("SSID ") && line.contains(':')
        })
        .count()
}
