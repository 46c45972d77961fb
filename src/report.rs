use crate::gate::GateDecision;
use crate::geocode::GeocodeResult;
use crate::location::Coordinate;
use crate::probes::EnvironmentSnapshot;

pub const LABEL_WIDTH: usize = 22;
const HEADER_WIDTH: usize = 31;

pub const UNKNOWN_NOTICE: &str = "GPS coordinates could not be resolved or are unknown.";
const BLOCKED_NOTICE: &str = "Unable to continue: location is disabled by policy. \
Verify that location permissions and services are enabled before trying again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Warn,
    Error,
}

pub enum Outcome {
    Unknown,
    Located {
        fix: Coordinate,
        address: GeocodeResult,
    },
}

/// Formats the report lines. Color is decided once at construction, from
/// whether stdout is an interactive terminal; everything else is selection
/// and padding.
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match severity {
            Severity::Ok => "\x1b[92m",
            Severity::Warn => "\x1b[93m",
            Severity::Error => "\x1b[91m",
        };
        format!("{code}{text}\x1b[0m")
    }

    fn labeled(&self, label: &str, value: &str, severity: Severity) -> String {
        format!(
            "{label:<width$}: {}",
            self.paint(value, severity),
            width = LABEL_WIDTH
        )
    }

    fn header(&self, title: &str, lines: &mut Vec<String>) {
        let bar = "=".repeat(HEADER_WIDTH);
        lines.push(String::new());
        lines.push(bar.clone());
        lines.push(format!("{title:^width$}", width = HEADER_WIDTH));
        lines.push(bar);
        lines.push(String::new());
    }

    /// Diagnostics section: environment summary, the fallback advisory, and
    /// the policy itemization when the gate blocked.
    pub fn preamble(
        &self,
        snapshot: &EnvironmentSnapshot,
        decision: &GateDecision,
        advisory: Option<&str>,
    ) -> Vec<String> {
        let mut lines = Vec::new();
        self.header("Diagnostics", &mut lines);

        let enabled = matches!(decision, GateDecision::Proceed);
        let (loc_text, loc_sev) = if enabled {
            ("Enabled", Severity::Ok)
        } else {
            ("Disabled", Severity::Error)
        };
        lines.push(self.labeled("Location Services", loc_text, loc_sev));

        let (wifi_text, wifi_sev) = if snapshot.wifi_radio_on {
            ("Enabled/Available", Severity::Ok)
        } else {
            ("Not available or disabled", Severity::Error)
        };
        lines.push(self.labeled("Wi-Fi", wifi_text, wifi_sev));
        lines.push(self.labeled(
            "Visible Network Count",
            &snapshot.visible_network_count.to_string(),
            Severity::Ok,
        ));

        let (air_text, air_sev) = if snapshot.airplane_mode_on {
            ("Enabled", Severity::Error)
        } else {
            ("Disabled", Severity::Ok)
        };
        lines.push(self.labeled("Airplane Mode", air_text, air_sev));
        lines.push(String::new());

        if let Some(note) = advisory {
            lines.push(self.paint(note, Severity::Warn));
        }
        if let GateDecision::Blocked { reasons } = decision {
            lines.push(self.paint(BLOCKED_NOTICE, Severity::Error));
            self.header("Location Permissions", &mut lines);
            for reason in reasons {
                lines.push(self.paint(&reason.text, reason.severity));
            }
        }
        lines
    }

    /// Results section, printed only after the gate allowed the run to
    /// continue.
    pub fn outcome(&self, outcome: &Outcome) -> Vec<String> {
        let mut lines = Vec::new();
        self.header("Location Results", &mut lines);
        match outcome {
            Outcome::Unknown => lines.push(self.paint(UNKNOWN_NOTICE, Severity::Warn)),
            Outcome::Located { fix, address } => {
                lines.push(self.labeled("Latitude", &fix.latitude.to_string(), Severity::Ok));
                lines.push(self.labeled("Longitude", &fix.longitude.to_string(), Severity::Ok));
                lines.push(self.labeled(
                    "Timestamp",
                    &fix.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    Severity::Ok,
                ));
                let (address_text, address_sev) = match address {
                    GeocodeResult::Resolved { display_name } => {
                        (display_name.as_str(), Severity::Ok)
                    }
                    GeocodeResult::Unresolved { reason } => (reason.as_str(), Severity::Warn),
                };
                lines.push(self.labeled("Resolved Address", address_text, address_sev));
                lines.push(self.labeled("Google Maps Link", &fix.maps_url(), Severity::Ok));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate;
    use chrono::{TimeZone, Utc};

    fn snapshot() -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            location_policy_present: false,
            location_disable_value: None,
            app_access_present: false,
            app_access_value: None,
            wifi_radio_on: true,
            visible_network_count: 2,
            airplane_mode_on: false,
        }
    }

    fn fix() -> Coordinate {
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        Coordinate::new(47.3769, 8.5417, "windows", timestamp)
    }

    #[test]
    fn labels_are_padded_to_a_fixed_width() {
        let renderer = Renderer::new(false);
        let snapshot = snapshot();
        let lines = renderer.preamble(&snapshot, &gate::evaluate(&snapshot), None);
        assert!(lines.contains(&"Location Services     : Enabled".to_string()));
        assert!(lines.contains(&"Visible Network Count : 2".to_string()));
    }

    #[test]
    fn headers_are_centered_between_bars() {
        let renderer = Renderer::new(false);
        let snapshot = snapshot();
        let lines = renderer.preamble(&snapshot, &gate::evaluate(&snapshot), None);
        assert_eq!(lines[1], "=".repeat(31));
        assert_eq!(lines[2], format!("{:^31}", "Diagnostics"));
        assert_eq!(lines[3], "=".repeat(31));
    }

    #[test]
    fn color_is_applied_only_when_enabled() {
        let plain = Renderer::new(false);
        let colored = Renderer::new(true);
        assert_eq!(plain.paint("Enabled", Severity::Ok), "Enabled");
        assert_eq!(
            colored.paint("Enabled", Severity::Ok),
            "\x1b[92mEnabled\x1b[0m"
        );
        assert_eq!(
            colored.paint("Disabled", Severity::Error),
            "\x1b[91mDisabled\x1b[0m"
        );
    }

    #[test]
    fn advisory_appears_in_the_preamble() {
        let renderer = Renderer::new(false);
        let snapshot = EnvironmentSnapshot {
            wifi_radio_on: false,
            ..snapshot()
        };
        let advisory = gate::fallback_advisory(&snapshot);
        let lines = renderer.preamble(&snapshot, &gate::evaluate(&snapshot), advisory);
        assert!(lines.iter().any(|l| l.contains("IP-based estimation")));
    }

    #[test]
    fn blocked_preamble_lists_policy_reasons() {
        let renderer = Renderer::new(false);
        let snapshot = EnvironmentSnapshot {
            location_policy_present: true,
            location_disable_value: Some(1),
            ..snapshot()
        };
        let lines = renderer.preamble(&snapshot, &gate::evaluate(&snapshot), None);
        assert!(lines.contains(&format!("{:^31}", "Location Permissions")));
        assert!(lines
            .iter()
            .any(|l| l == "DisableLocation: 1 (Location services disabled)"));
    }

    #[test]
    fn unknown_outcome_shows_the_unknown_notice() {
        let renderer = Renderer::new(false);
        let lines = renderer.outcome(&Outcome::Unknown);
        assert!(lines.contains(&UNKNOWN_NOTICE.to_string()));
    }

    #[test]
    fn unresolved_address_still_shows_the_map_link() {
        let renderer = Renderer::new(false);
        let outcome = Outcome::Located {
            fix: fix(),
            address: GeocodeResult::Unresolved {
                reason: crate::geocode::RESOLUTION_FAILED.to_string(),
            },
        };
        let lines = renderer.outcome(&outcome);
        assert!(lines
            .contains(&"Resolved Address      : Address resolution failed (API error).".to_string()));
        assert!(lines
            .contains(&"Google Maps Link      : https://www.google.com/maps?q=47.3769,8.5417".to_string()));
    }

    #[test]
    fn resolved_outcome_shows_coordinates_and_timestamp() {
        let renderer = Renderer::new(false);
        let outcome = Outcome::Located {
            fix: fix(),
            address: GeocodeResult::Resolved {
                display_name: "Bahnhofstrasse, Zurich, Switzerland".to_string(),
            },
        };
        let lines = renderer.outcome(&outcome);
        assert!(lines.contains(&"Latitude              : 47.3769".to_string()));
        assert!(lines.contains(&"Timestamp             : 2024-05-01 12:30:00".to_string()));
        assert!(lines
            .contains(&"Resolved Address      : Bahnhofstrasse, Zurich, Switzerland".to_string()));
    }
}
