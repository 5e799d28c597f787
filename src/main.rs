//! # tracklanes
//!
//! Command-line front end: loads a library snapshot, runs the recommendation or
//! duplicate engine over it and prints the result.
//!
//! ## Usage
//!
//! ```bash
//! # Lanes for the configured library database
//! tracklanes recommend
//!
//! # Reproducible lanes from a JSON export, tempo-matched to a track
//! tracklanes recommend --json snapshot.json --seed 7 --playing "/music/a.flac"
//!
//! # Duplicate groups as JSON
//! tracklanes duplicates --db library.db --format json
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use tracklanes::cli::{self, SnapshotSource};
use tracklanes::config::{OutputFormat, RuntimeConfig};
use tracklanes::shuffle::RandomShuffler;
use tracklanes::track::{ticks, Track};
use tracklanes::{completion, db, display, duplicates, recommend};

/// Load the snapshot named on the command line, or else the configured
/// database. `load_config` only runs in the latter case.
fn load_snapshot(
    source: &SnapshotSource,
    load_config: impl FnOnce() -> Result<RuntimeConfig>,
) -> Result<Vec<Track>> {
    match (&source.json, &source.db) {
        (Some(json), _) => db::load_tracks_json(json),
        (None, Some(db_path)) => db::load_visible_tracks(db_path),
        (None, None) => {
            debug!("No snapshot given, using configured database");
            db::load_visible_tracks(&load_config()?.db_path)
        }
    }
}

/// The `--format` flag, or else the configured default.
fn output_format(
    requested: Option<OutputFormat>,
    load_config: impl FnOnce() -> Result<RuntimeConfig>,
) -> Result<OutputFormat> {
    match requested {
        Some(format) => Ok(format),
        None => Ok(load_config()?.default_format),
    }
}

/// Main entry point.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug tracklanes recommend` - Lane sizes and load counts
/// - `RUST_LOG=tracklanes::recommend=trace tracklanes recommend` - Lane decisions
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Recommend { source, playing, seed, now_ticks, format } => {
            let tracks = load_snapshot(&source, RuntimeConfig::load)?;

            let current = playing.as_deref().and_then(|path| {
                let found = tracks.iter().find(|track| track.path == path);
                if found.is_none() {
                    warn!("Playing track {path} is not in the library, ignoring it");
                }
                found
            });

            let now = now_ticks.unwrap_or_else(ticks::now);
            let mut shuffler = match seed {
                Some(seed) => RandomShuffler::seeded(seed),
                None => RandomShuffler::from_entropy(),
            };

            info!("Generating recommendations for {} tracks", tracks.len());
            let lanes = recommend::generate_all_recommendations(&tracks, current, now, &mut shuffler);

            match output_format(format, RuntimeConfig::load)? {
                OutputFormat::Text => print!("{}", display::render_lanes(&lanes)),
                OutputFormat::Json => println!("{}", display::to_json(&lanes)?),
            }
        }
        cli::Command::Duplicates { source, format } => {
            let tracks = load_snapshot(&source, RuntimeConfig::load)?;

            info!("Detecting duplicates among {} tracks", tracks.len());
            let groups = duplicates::detect_duplicates(&tracks);

            match output_format(format, RuntimeConfig::load)? {
                OutputFormat::Text => print!("{}", display::render_duplicates(&groups)),
                OutputFormat::Json => println!("{}", display::to_json(&groups)?),
            }
        }
        cli::Command::Lanes => {
            print!("{}", display::render_lane_catalog());
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
    }

    Ok(())
}
