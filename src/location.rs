use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub provider: String,
    pub timestamp: DateTime<Utc>,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64, provider: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude: lat,
            longitude: lon,
            provider: provider.to_string(),
            timestamp,
        }
    }

    pub fn maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps?q={},{}",
            self.latitude, self.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_url_carries_both_components() {
        let fix = Coordinate::new(-33.9249, 18.4241, "ip", Utc::now());
        assert_eq!(
            fix.maps_url(),
            "https://www.google.com/maps?q=-33.9249,18.4241"
        );
    }
}
