use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Duration;

use crate::telemetry::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionChange {
    Up,
    Down,
    Same,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub driver_number: u32,
    pub gap_to_leader: Option<f64>,
    pub interval: Option<f64>,
    pub date: DateTime<Utc>,
    pub position: usize,
    pub previous_position: Option<usize>,
    pub change: Option<PositionChange>,
}

/// Interval updates after the session start, in time order
#[derive(Debug, Clone)]
pub struct LeaderboardFeed {
    intervals: Vec<Interval>,
}

impl LeaderboardFeed {
    pub fn new(mut intervals: Vec<Interval>, date_start: DateTime<Utc>) -> Self {
        intervals.retain(|i| i.date > date_start);
        intervals.sort_by_key(|i| i.date);
        Self { intervals }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardState {
    /// Next interval to apply
    pub cursor: usize,
    /// Wall time accumulated towards the next tick
    pub carry_ms: f64,
    pub standings: Vec<Standing>,
    pub current_time: Option<DateTime<Utc>>,
}

impl LeaderboardState {
    pub fn is_finished(&self, feed: &LeaderboardFeed) -> bool {
        self.cursor >= feed.len()
    }
}

fn gap_order(a: &Standing, b: &Standing) -> Ordering {
    let a = a.gap_to_leader.unwrap_or(f64::INFINITY);
    let b = b.gap_to_leader.unwrap_or(f64::INFINITY);
    a.total_cmp(&b)
}

/// Apply the next interval update; a finished feed returns the state unchanged
pub fn step(feed: &LeaderboardFeed, mut state: LeaderboardState) -> LeaderboardState {
    let Some(update) = feed.intervals.get(state.cursor) else {
        return state;
    };

    for standing in &mut state.standings {
        standing.previous_position = Some(standing.position);
    }

    let previous_position = state
        .standings
        .iter()
        .position(|s| s.driver_number == update.driver_number)
        .map(|i| state.standings.remove(i).position);

    state.standings.push(Standing {
        driver_number: update.driver_number,
        gap_to_leader: update.gap_to_leader,
        interval: update.interval,
        date: update.date,
        position: 0,
        previous_position,
        change: None,
    });
    state.standings.sort_by(gap_order);

    for (i, standing) in state.standings.iter_mut().enumerate() {
        standing.position = i + 1;
        standing.change = standing.previous_position.map(|prev| match standing.position.cmp(&prev) {
            Ordering::Less => PositionChange::Up,
            Ordering::Greater => PositionChange::Down,
            Ordering::Equal => PositionChange::Same,
        });
    }

    state.current_time = Some(update.date);
    state.cursor += 1;
    state
}

/// Apply one update per whole `tick` of `elapsed` time, carrying the remainder
pub fn advance(
    feed: &LeaderboardFeed,
    mut state: LeaderboardState,
    elapsed: Duration,
    tick: Duration,
) -> LeaderboardState {
    let tick_ms = tick.as_secs_f64() * 1000.0;
    if tick_ms <= 0.0 {
        return state;
    }

    state.carry_ms += elapsed.as_secs_f64() * 1000.0;
    while state.carry_ms >= tick_ms && !state.is_finished(feed) {
        state.carry_ms -= tick_ms;
        state = step(feed, state);
    }

    if state.is_finished(feed) {
        state.carry_ms = 0.0;
    }
    state
}
