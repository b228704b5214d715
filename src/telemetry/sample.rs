use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::records::Location;

/// One raw telemetry observation fed to the circuit reconstructor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub source_id: u32,
    pub timestamp: DateTime<Utc>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RawSample {
    fn at_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<&Location> for RawSample {
    fn from(loc: &Location) -> Self {
        Self {
            source_id: loc.driver_number,
            timestamp: loc.date,
            x: loc.x,
            y: loc.y,
            z: loc.z,
        }
    }
}

/// Sort by time and drop everything up to and including the last (0, 0) reading.
///
/// The location feed reports cars parked in the garage at the origin, so only
/// the readings after the final origin sample describe the circuit.
pub fn trim_before_last_origin(mut samples: Vec<RawSample>) -> Vec<RawSample> {
    samples.sort_by_key(|s| s.timestamp);

    match samples.iter().rposition(RawSample::at_origin) {
        Some(last) => samples.split_off(last + 1),
        None => samples,
    }
}
