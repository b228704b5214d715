mod records;
mod sample;


pub use records::{
    Interval, Location, Position, Session, TelemetryRecord, Validate, parse_records,
};
pub use sample::{RawSample, trim_before_last_origin};
