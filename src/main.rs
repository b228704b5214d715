use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use pitwall::{
    ChunkedCache, CircuitReconstructor, DriverTrack, Interval, LeaderboardFeed, LeaderboardState,
    Location, RawSample, Settings, SqliteStore, parse_records, playback::driver,
    playback::leaderboard, trim_before_last_origin,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pitwall")]
#[command(about = "Circuit reconstruction and telemetry cache for F1 location data", version)]
struct Cli {
    /// Path to JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the circuit path from a JSON array of location records
    Reconstruct {
        input: PathBuf,
        /// Per-axis merge tolerance (overrides settings)
        #[arg(short, long)]
        radius: Option<f64>,
        /// Keep readings taken before the car left the garage
        #[arg(long)]
        keep_garage: bool,
    },

    /// Chunked record cache backed by SQLite
    Cache {
        /// Database file (overrides settings)
        #[arg(long)]
        db: Option<PathBuf>,

        #[command(subcommand)]
        action: CacheAction,
    },

    /// Replay one car's location feed frame by frame and print each position
    Replay {
        input: PathBuf,
        /// Car to replay when the feed holds several
        #[arg(long)]
        driver: Option<u32>,
        /// Playback speed (overrides settings)
        #[arg(long)]
        speed: Option<f64>,
    },

    /// Replay interval updates and print the final standings
    Leaderboard {
        input: PathBuf,
        /// Session start; earlier updates are ignored
        #[arg(long)]
        start: DateTime<Utc>,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Store a JSON array under a key
    Save {
        key: String,
        input: PathBuf,
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Print the records stored under a key
    Read { key: String },
    /// Report whether a key is present
    Exists { key: String },
    /// Delete every chunk of a key
    Clear { key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Reconstruct {
            input,
            radius,
            keep_garage,
        } => run_reconstruct(&settings, &input, radius, keep_garage),
        Commands::Cache { db, action } => run_cache(&settings, db, action),
        Commands::Replay {
            input,
            driver,
            speed,
        } => run_replay(&settings, &input, driver, speed),
        Commands::Leaderboard { input, start } => run_leaderboard(&settings, &input, start),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_reconstruct(
    settings: &Settings,
    input: &Path,
    radius: Option<f64>,
    keep_garage: bool,
) -> Result<()> {
    let start = Instant::now();
    let locations: Vec<Location> = parse_records(&read_input(input)?)
        .with_context(|| format!("Invalid location data in {}", input.display()))?;

    let mut samples: Vec<RawSample> = locations.iter().map(RawSample::from).collect();
    if settings.circuit.trim_before_origin && !keep_garage {
        samples = trim_before_last_origin(samples);
    }

    let reconstructor =
        CircuitReconstructor::new(radius.unwrap_or(settings.circuit.cluster_radius))?;
    let path = reconstructor.reconstruct(&samples);

    tracing::info!(
        samples = samples.len(),
        points = path.len(),
        length = path.closed_length(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "circuit reconstructed"
    );

    let output = serde_json::json!({
        "points": path.points(),
        "bounds": path.bounds(),
        "closed_length": path.closed_length(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_cache(settings: &Settings, db: Option<PathBuf>, action: CacheAction) -> Result<()> {
    let db_path = db.unwrap_or_else(|| settings.cache.path.clone());
    let db_str = db_path
        .to_str()
        .with_context(|| format!("Non UTF-8 database path: {}", db_path.display()))?;
    let store = SqliteStore::open(db_str)?;
    let mut cache = ChunkedCache::new(store).with_chunk_size(settings.cache.chunk_size)?;

    match action {
        CacheAction::Save {
            key,
            input,
            chunk_size,
        } => {
            let records: Vec<serde_json::Value> = serde_json::from_str(&read_input(&input)?)
                .with_context(|| format!("{} is not a JSON array", input.display()))?;
            let chunks = match chunk_size {
                Some(size) => cache.save(&key, &records, size)?,
                None => cache.save_default(&key, &records)?,
            };
            tracing::info!(key = %key, records = records.len(), chunks, "saved");
        }
        CacheAction::Read { key } => {
            let records: Vec<serde_json::Value> = cache.read(&key)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        CacheAction::Exists { key } => {
            println!("{}", cache.exists(&key)?);
        }
        CacheAction::Clear { key } => {
            let removed = cache.clear(&key)?;
            tracing::info!(key = %key, removed, "cleared");
        }
    }

    Ok(())
}

fn run_replay(
    settings: &Settings,
    input: &Path,
    driver_number: Option<u32>,
    speed: Option<f64>,
) -> Result<()> {
    let mut locations: Vec<Location> = parse_records(&read_input(input)?)
        .with_context(|| format!("Invalid location data in {}", input.display()))?;

    match driver_number {
        Some(number) => locations.retain(|l| l.driver_number == number),
        None => {
            if let Some(first) = locations.first() {
                let number = first.driver_number;
                if locations.iter().any(|l| l.driver_number != number) {
                    bail!("{} holds several drivers; pick one with --driver", input.display());
                }
            }
        }
    }

    let speed = speed.unwrap_or(settings.playback.speed_multiplier);
    if !speed.is_finite() || speed <= 0.0 {
        bail!("Speed must be positive, got {}", speed);
    }

    let track = DriverTrack::from_locations(&locations);
    if track.is_empty() {
        tracing::warn!(input = %input.display(), "no on-track samples to replay");
    }

    let frame = Duration::from_millis(settings.playback.frame_interval_ms);
    let frames = driver::replay_once(&track, frame, speed);

    tracing::info!(
        points = track.points().len(),
        frames = frames.len(),
        duration_ms = track.duration_ms(),
        speed,
        "driver replay finished"
    );

    let output: Vec<_> = frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.loops == 0)
        .filter_map(|(n, f)| {
            f.position.map(|(x, y)| {
                serde_json::json!({
                    "frame": n,
                    "elapsed_ms": f.elapsed_ms,
                    "x": x,
                    "y": y,
                })
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_leaderboard(settings: &Settings, input: &Path, start: DateTime<Utc>) -> Result<()> {
    let intervals: Vec<Interval> = parse_records(&read_input(input)?)
        .with_context(|| format!("Invalid interval data in {}", input.display()))?;
    let feed = LeaderboardFeed::new(intervals, start);
    let tick = Duration::from_millis(settings.playback.leaderboard_tick_ms);

    let mut state = LeaderboardState::default();
    while !state.is_finished(&feed) {
        state = leaderboard::advance(&feed, state, tick, tick);
    }

    tracing::info!(updates = feed.len(), drivers = state.standings.len(), "replay finished");
    println!("{}", serde_json::to_string_pretty(&state.standings)?);
    Ok(())
}
