//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `tracklanes` binary.
//!
//! ## Commands
//!
//! - `recommend`: Compute recommendation lanes for a library snapshot
//! - `duplicates`: List groups of probable duplicate tracks
//! - `lanes`: Describe the available lanes
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! tracklanes recommend --db ~/library.db --playing "/music/a.flac"
//! tracklanes duplicates --json snapshot.json --format json
//! ```

use crate::config::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "tracklanes")]
#[command(about = "Recommendation lanes & duplicate detection for personal music libraries")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Where the track snapshot comes from.
///
/// With neither flag, the database from the configuration file is read.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SnapshotSource {
    /// Library database to read (opened read-only)
    #[arg(long, value_name = "PATH", env = "TRACKLANES_DB", conflicts_with = "json")]
    pub db: Option<PathBuf>,

    /// JSON array of track records to read instead of a database
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute recommendation lanes
    ///
    /// Runs every lane over the library snapshot and prints the non-empty ones
    /// in their fixed order. Shuffled lanes differ between runs unless a seed
    /// is given.
    Recommend {
        #[command(flatten)]
        source: SnapshotSource,

        /// Path of the currently playing track, used as the tempo reference
        #[arg(long, value_name = "PATH")]
        playing: Option<String>,

        /// Seed for the shuffled lanes, for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Reference time in ticks (100 ns since 0001-01-01); defaults to now
        #[arg(long, value_name = "TICKS")]
        now_ticks: Option<i64>,

        /// Output format (overrides the configured default)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List groups of probable duplicate tracks
    ///
    /// Tracks match when title and artist agree ignoring case and surrounding
    /// whitespace, and durations chain within two seconds.
    Duplicates {
        #[command(flatten)]
        source: SnapshotSource,

        /// Output format (overrides the configured default)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Describe every lane
    Lanes,

    /// Generate shell completions
    ///
    /// Usage: tracklanes completion bash > ~/.local/share/bash-completion/completions/tracklanes
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
