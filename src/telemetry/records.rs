use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// One car location reading from the `/location` feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub date: DateTime<Utc>,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub session_key: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Timing gap reading from the `/intervals` feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub date: DateTime<Utc>,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub session_key: u32,
    /// Seconds behind the leader; `None` for the leader's own null or a lapped car
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub gap_to_leader: Option<f64>,
    /// Seconds behind the car ahead
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub interval: Option<f64>,
}

/// Classified position from the `/position` feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub date: DateTime<Utc>,
    pub driver_number: u32,
    pub meeting_key: u32,
    pub session_key: u32,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_key: u32,
    pub meeting_key: u32,
    pub session_name: String,
    pub session_type: String,
    pub circuit_key: u32,
    pub circuit_short_name: String,
    pub country_code: String,
    pub country_key: u32,
    pub country_name: String,
    pub location: String,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    pub gmt_offset: String,
    pub year: i32,
}

/// Heterogeneous feed record, tagged so mixed sequences survive a cache round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TelemetryRecord {
    Location(Location),
    Interval(Interval),
    Position(Position),
}

impl TelemetryRecord {
    pub fn driver_number(&self) -> u32 {
        match self {
            TelemetryRecord::Location(r) => r.driver_number,
            TelemetryRecord::Interval(r) => r.driver_number,
            TelemetryRecord::Position(r) => r.driver_number,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            TelemetryRecord::Location(r) => r.date,
            TelemetryRecord::Interval(r) => r.date,
            TelemetryRecord::Position(r) => r.date,
        }
    }
}

/// Boundary check applied to every record decoded from the feed
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn check_driver(driver_number: u32) -> Result<()> {
    if driver_number == 0 {
        return Err(Error::InvalidRecord("driver_number must be positive".to_string()));
    }
    Ok(())
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidRecord(format!("{} is not finite: {}", name, value)));
    }
    Ok(())
}

impl Validate for Location {
    fn validate(&self) -> Result<()> {
        check_driver(self.driver_number)?;
        check_finite("x", self.x)?;
        check_finite("y", self.y)?;
        check_finite("z", self.z)
    }
}

impl Validate for Interval {
    fn validate(&self) -> Result<()> {
        check_driver(self.driver_number)?;
        for (name, value) in [("gap_to_leader", self.gap_to_leader), ("interval", self.interval)] {
            if let Some(v) = value {
                check_finite(name, v)?;
                if v < 0.0 {
                    return Err(Error::InvalidRecord(format!("{} is negative: {}", name, v)));
                }
            }
        }
        Ok(())
    }
}

impl Validate for Position {
    fn validate(&self) -> Result<()> {
        check_driver(self.driver_number)?;
        if self.position == 0 {
            return Err(Error::InvalidRecord(format!(
                "driver {} has position 0",
                self.driver_number
            )));
        }
        Ok(())
    }
}

impl Validate for Session {
    fn validate(&self) -> Result<()> {
        if self.date_end < self.date_start {
            return Err(Error::InvalidRecord(format!(
                "session {} ends before it starts",
                self.session_key
            )));
        }
        Ok(())
    }
}

impl Validate for TelemetryRecord {
    fn validate(&self) -> Result<()> {
        match self {
            TelemetryRecord::Location(r) => r.validate(),
            TelemetryRecord::Interval(r) => r.validate(),
            TelemetryRecord::Position(r) => r.validate(),
        }
    }
}

/// Decode a JSON array of records and validate each one
pub fn parse_records<T>(json: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned + Validate,
{
    let records: Vec<T> = serde_json::from_str(json).map_err(Error::Decode)?;
    for (i, record) in records.iter().enumerate() {
        record.validate().map_err(|e| match e {
            Error::InvalidRecord(msg) => Error::InvalidRecord(format!("record {}: {}", i, msg)),
            other => other,
        })?;
    }
    Ok(records)
}

/// Gaps arrive as numbers, null, or strings like "+1 LAP"
fn lenient_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_start_matches('+').parse::<f64>().ok(),
        _ => None,
    })
}
