use std::io::ErrorKind;
use std::time::Duration;

use tokio::process::Command;
use winreg::enums::HKEY_LOCAL_MACHINE;
use winreg::RegKey;

use super::{radio_software_on, visible_network_count, EnvironmentSnapshot};

const LOCATION_POLICY_SUBKEY: &str = r"SOFTWARE\Policies\Microsoft\Windows\LocationAndSensors";
const APP_PRIVACY_SUBKEY: &str = r"SOFTWARE\Policies\Microsoft\Windows\AppPrivacy";
const RADIO_STATE_SUBKEY: &str =
    r"System\CurrentControlSet\Control\RadioManagement\SystemRadioState";

const NETSH_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn capture(verbose: bool) -> EnvironmentSnapshot {
    let (location_policy_present, location_disable_value) =
        read_policy_value(LOCATION_POLICY_SUBKEY, "DisableLocation");
    let (app_access_present, app_access_value) =
        read_policy_value(APP_PRIVACY_SUBKEY, "LetAppsAccessLocation");

    let wifi_radio_on = netsh(&["wlan", "show", "interfaces"], verbose)
        .await
        .map(|output| radio_software_on(&output))
        .unwrap_or(false);
    // A scan is pointless with the radio off; report 0 without invoking netsh.
    let network_count = if wifi_radio_on {
        netsh(&["wlan", "show", "networks"], verbose)
            .await
            .map(|output| visible_network_count(&output))
            .unwrap_or(0)
    } else {
        0
    };

    EnvironmentSnapshot {
        location_policy_present,
        location_disable_value,
        app_access_present,
        app_access_value,
        wifi_radio_on,
        visible_network_count: network_count,
        airplane_mode_on: airplane_mode_on(),
    }
}

/// Mirrors the policy-read contract: key missing -> (false, None), key present
/// but value missing or unreadable -> (true, None).
fn read_policy_value(subkey: &str, name: &str) -> (bool, Option<u32>) {
    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    match hklm.open_subkey(subkey) {
        Ok(key) => match key.get_value::<u32, _>(name) {
            Ok(value) => (true, Some(value)),
            Err(_) => (true, None),
        },
        Err(err) if err.kind() == ErrorKind::NotFound => (false, None),
        Err(_) => (true, None),
    }
}

/// SystemRadioState holds 1 when all radios are off. Absent or unreadable
/// reads as airplane mode off.
fn airplane_mode_on() -> bool {
    RegKey::predef(HKEY_LOCAL_MACHINE)
        .open_subkey(RADIO_STATE_SUBKEY)
        .and_then(|key| key.get_value::<u32, _>(""))
        .map(|value| value == 1)
        .unwrap_or(false)
}

async fn netsh(args: &[&str], verbose: bool) -> Option<String> {
    let invocation = Command::new("netsh")
        .args(args)
        .kill_on_drop(true)
        .output();
    match tokio::time::timeout(NETSH_TIMEOUT, invocation).await {
        Ok(Ok(output)) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        Ok(Err(err)) => {
            if verbose {
                eprintln!("geo-doctor: netsh {} failed: {err}", args.join(" "));
            }
            None
        }
        Err(_) => {
            if verbose {
                eprintln!("geo-doctor: netsh {} timed out", args.join(" "));
            }
            None
        }
    }
}
