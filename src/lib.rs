//! Recommendation lanes and duplicate detection for personal music libraries.
//!
//! Core modules:
//! - [`recommend`] - The ten recommendation lanes
//! - [`duplicates`] - Duplicate track detection
//! - [`track`] - Track records and tick timestamps
//! - [`shuffle`] - Injected shuffling for the randomized lanes
//!
//! ### Supporting Modules
//!
//! - [`db`] - Read-only snapshot loading (SQLite library database or JSON)
//! - [`config`] - Configuration and data directory management
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`display`] - Text rendering of lanes and duplicate groups
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use tracklanes::{db, duplicates, recommend, shuffle::RandomShuffler, track::ticks};
//!
//! let tracks = db::load_visible_tracks(std::path::Path::new("library.db"))?;
//!
//! let mut shuffler = RandomShuffler::from_entropy();
//! for lane in recommend::generate_all_recommendations(&tracks, None, ticks::now(), &mut shuffler) {
//!     println!("{}: {} tracks", lane.id, lane.tracks.len());
//! }
//!
//! for group in duplicates::detect_duplicates(&tracks) {
//!     println!("{} - {}: {} copies", group.artists, group.title, group.tracks.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Engine Properties
//!
//! Both engines are pure functions of their input: they borrow the snapshot,
//! never modify it, and return references into it. The only other inputs are
//! the reference time (`now`, in ticks) and a [`shuffle::Shuffler`]; seed the
//! shuffler and the output is reproducible.
//!
//! ## Error Handling
//!
//! The engines cannot fail: missing tempo, genres or dates simply keep a track
//! out of the lanes that need them. Loading and configuration return
//! `anyhow::Result` with context on the failing path.

pub mod cli;
pub mod completion;
pub mod config;
pub mod db;
pub mod display;
pub mod duplicates;
pub mod recommend;
pub mod shuffle;
pub mod track;
