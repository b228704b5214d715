use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CHUNK_SIZE;
use crate::circuit::DEFAULT_CLUSTER_RADIUS;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub circuit: CircuitSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitSettings {
    /// Per-axis merge tolerance in feed units
    #[serde(default = "default_cluster_radius")]
    pub cluster_radius: f64,

    /// Drop readings up to the last garage (0, 0) sample
    #[serde(default = "default_true")]
    pub trim_before_origin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,

    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    #[serde(default = "default_leaderboard_tick_ms")]
    pub leaderboard_tick_ms: u64,
}

fn default_cluster_radius() -> f64 {
    DEFAULT_CLUSTER_RADIUS
}

fn default_true() -> bool {
    true
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("pitwall-cache.sqlite")
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_speed_multiplier() -> f64 {
    1.0
}

fn default_frame_interval_ms() -> u64 {
    16 // ~60 fps
}

fn default_leaderboard_tick_ms() -> u64 {
    300
}

impl Default for CircuitSettings {
    fn default() -> Self {
        Self {
            cluster_radius: default_cluster_radius(),
            trim_before_origin: default_true(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            speed_multiplier: default_speed_multiplier(),
            frame_interval_ms: default_frame_interval_ms(),
            leaderboard_tick_ms: default_leaderboard_tick_ms(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)
            .map_err(|e| Error::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let radius = self.circuit.cluster_radius;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::Config(format!(
                "circuit.cluster_radius must be positive, got {}",
                radius
            )));
        }
        if self.cache.chunk_size == 0 {
            return Err(Error::Config("cache.chunk_size must be greater than 0".to_string()));
        }
        let speed = self.playback.speed_multiplier;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::Config(format!(
                "playback.speed_multiplier must be positive, got {}",
                speed
            )));
        }
        if self.playback.frame_interval_ms == 0 || self.playback.leaderboard_tick_ms == 0 {
            return Err(Error::Config("playback intervals must be greater than 0".to_string()));
        }
        Ok(())
    }
}
