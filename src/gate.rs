use crate::probes::{EnvironmentSnapshot, APP_PRIVACY_KEY, LOCATION_POLICY_KEY};
use crate::report::Severity;

pub const FALLBACK_ADVISORY: &str = "Unable to perform Wi-Fi triangulation. \
Location will fall back to IP-based estimation; accuracy may vary.";

#[derive(Debug, Clone, PartialEq)]
pub struct Reason {
    pub text: String,
    pub severity: Severity,
}

impl Reason {
    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Proceed,
    Blocked { reasons: Vec<Reason> },
}

/// Location counts as enabled unless the policy key exists and carries a
/// present, nonzero disable value. Missing key and missing value both fail
/// open; changing this to fail closed would change observable behavior.
pub fn location_enabled(snapshot: &EnvironmentSnapshot) -> bool {
    !(snapshot.location_policy_present
        && matches!(snapshot.location_disable_value, Some(value) if value != 0))
}

/// Pure gate: the same snapshot always yields the same decision. Blocked
/// decisions itemize both policy keys so the report can show exactly which
/// setting is in the way.
pub fn evaluate(snapshot: &EnvironmentSnapshot) -> GateDecision {
    if location_enabled(snapshot) {
        return GateDecision::Proceed;
    }

    let mut reasons = Vec::new();
    if snapshot.location_policy_present {
        reasons.push(Reason::new(
            format!("Registry key exists: {LOCATION_POLICY_KEY}"),
            Severity::Ok,
        ));
        match snapshot.location_disable_value {
            Some(0) => reasons.push(Reason::new(
                "DisableLocation: 0 (Location services enabled)",
                Severity::Ok,
            )),
            Some(value) => reasons.push(Reason::new(
                format!("DisableLocation: {value} (Location services disabled)"),
                Severity::Error,
            )),
            None => reasons.push(Reason::new(
                "DisableLocation value is missing",
                Severity::Warn,
            )),
        }
    } else {
        reasons.push(Reason::new(
            format!("Registry key missing: {LOCATION_POLICY_KEY}"),
            Severity::Error,
        ));
    }

    if snapshot.app_access_present {
        reasons.push(Reason::new(
            format!("Registry key exists: {APP_PRIVACY_KEY}"),
            Severity::Ok,
        ));
        match snapshot.app_access_value {
            Some(1) => reasons.push(Reason::new(
                "LetAppsAccessLocation: 1 (Enabled)",
                Severity::Ok,
            )),
            Some(value) => reasons.push(Reason::new(
                format!("LetAppsAccessLocation: {value} (Disabled)"),
                Severity::Error,
            )),
            None => reasons.push(Reason::new(
                "LetAppsAccessLocation value is missing",
                Severity::Warn,
            )),
        }
    } else {
        reasons.push(Reason::new(
            format!("Registry key missing: {APP_PRIVACY_KEY}"),
            Severity::Error,
        ));
    }

    GateDecision::Blocked { reasons }
}

/// Advisory only, never blocking: with the radio off or airplane mode on the
/// platform cannot triangulate and will estimate from the IP address instead.
pub fn fallback_advisory(snapshot: &EnvironmentSnapshot) -> Option<&'static str> {
    if !snapshot.wifi_radio_on || snapshot.airplane_mode_on {
        Some(FALLBACK_ADVISORY)
    } else {
        None
    }
}
