// Public API exports
pub mod cache;
pub mod circuit;
pub mod config;
pub mod error;
pub mod playback;
pub mod telemetry;

// Re-export main types for convenience
pub use error::{Error, Result};

pub use telemetry::{
    Interval, Location, Position, RawSample, Session, TelemetryRecord, Validate, parse_records,
    trim_before_last_origin,
};

pub use circuit::{
    Bounds, CircuitReconstructor, Cluster, DEFAULT_CLUSTER_RADIUS, OrderedPath, Point3, reconstruct,
};

pub use cache::{ChunkedCache, DEFAULT_CHUNK_SIZE, KvStore, MemoryStore, SqliteStore};

pub use playback::{
    DriverPlayback, DriverTrack, LeaderboardFeed, LeaderboardState, PositionChange, Standing,
};

pub use config::Settings;
