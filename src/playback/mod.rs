//! Discrete-time replay steppers.
//!
//! Each replay owns its state value and moves it forward through a pure
//! `advance(state, elapsed)` call, so the host decides how time is driven
//! (a UI timer, a fixed-step loop, or a test).

pub mod driver;
pub mod leaderboard;


pub use driver::{DriverPlayback, DriverTrack, TrackPoint, replay_once};
pub use leaderboard::{
    LeaderboardFeed, LeaderboardState, PositionChange, Standing,
};
