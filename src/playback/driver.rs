use std::time::Duration;

use crate::telemetry::{Location, RawSample, trim_before_last_origin};

/// A planar position at a time offset from the start of the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub offset_ms: i64,
    pub x: f64,
    pub y: f64,
}

/// Time-ordered positions of one car, garage readings removed
#[derive(Debug, Clone, Default)]
pub struct DriverTrack {
    points: Vec<TrackPoint>,
}

impl DriverTrack {
    /// Build from one car's location feed. Order does not matter; samples
    /// up to the last garage reading at the origin are dropped.
    pub fn from_locations(locations: &[Location]) -> Self {
        let samples = locations.iter().map(RawSample::from).collect();
        let trimmed = trim_before_last_origin(samples);
        let Some(first) = trimmed.first().map(|s| s.timestamp) else {
            return Self::default();
        };

        let points = trimmed
            .iter()
            .map(|s| TrackPoint {
                offset_ms: (s.timestamp - first).num_milliseconds(),
                x: s.x,
                y: s.y,
            })
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Offset of the final point
    pub fn duration_ms(&self) -> i64 {
        self.points.last().map(|p| p.offset_ms).unwrap_or(0)
    }
}

/// Per-instance replay state for one car
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverPlayback {
    /// Index of the point currently shown
    pub index: usize,
    /// Scaled race time since the start of the current loop
    pub elapsed_ms: f64,
    pub position: Option<(f64, f64)>,
    /// Times the replay ran off the end and restarted
    pub loops: u32,
}

/// Move the replay forward by `elapsed` wall time scaled by `speed`.
///
/// Shows the first point whose offset has not yet been passed. Once the
/// accumulated time runs past the last point the clock restarts at zero and
/// the last shown position is kept until the next step.
pub fn advance(
    track: &DriverTrack,
    state: DriverPlayback,
    elapsed: Duration,
    speed: f64,
) -> DriverPlayback {
    if track.is_empty() {
        return state;
    }

    let elapsed_ms = state.elapsed_ms + elapsed.as_secs_f64() * 1000.0 * speed;
    let index = track
        .points
        .partition_point(|p| (p.offset_ms as f64) < elapsed_ms);

    match track.points.get(index) {
        Some(point) => DriverPlayback {
            index,
            elapsed_ms,
            position: Some((point.x, point.y)),
            loops: state.loops,
        },
        None => DriverPlayback {
            index: 0,
            elapsed_ms: 0.0,
            position: state.position,
            loops: state.loops + 1,
        },
    }
}

/// Step through one full pass of `track` at a fixed frame interval,
/// returning the state after every frame up to and including the one that
/// wraps. An empty track yields no frames.
pub fn replay_once(track: &DriverTrack, frame: Duration, speed: f64) -> Vec<DriverPlayback> {
    let mut frames = Vec::new();
    if track.is_empty() || frame.is_zero() || !speed.is_finite() || speed <= 0.0 {
        return frames;
    }

    let mut state = DriverPlayback::default();
    while state.loops == 0 {
        state = advance(track, state, frame, speed);
        frames.push(state);
    }
    frames
}
