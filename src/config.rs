//! # Configuration Module
//!
//! Runtime configuration and data directory management for tracklanes.
//!
//! ## Data Storage
//!
//! Configuration lives in the platform-standard data directory:
//! - Linux: `~/.local/share/tracklanes/config.json`
//! - macOS: `~/Library/Application Support/tracklanes/config.json`
//! - Windows: `%APPDATA%\tracklanes\config.json`
//!
//! Every field is optional in the file; command-line flags override it.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "db_path": "/home/me/.local/share/library-app/library.db",
//!   "default_format": "json"
//! }
//! ```
//!
//! `default_format` is `text` or `json`. A missing file is the same as `{}`.
//!
//! ## When It Is Read
//!
//! The binary only loads the configuration when a command actually needs a
//! value from it: no `--db`/`--json` snapshot was given, or no `--format`.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tracklanes";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_DB_FILE: &str = "library.db";

/// Directory holding `config.json` and, by default, `library.db`.
///
/// The directory is `<platform data dir>/tracklanes` and is created on first
/// use, so callers can write into it right away.
///
/// # Errors
///
/// Fails when the platform has no data directory (`dirs::data_dir` returns
/// `None`) or when the directory cannot be created.
///
/// # Examples
///
/// ```no_run
/// use tracklanes::config::get_data_dir;
///
/// let dir = get_data_dir()?;
/// println!("Looking for config.json in {}", dir.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_data_dir() -> Result<PathBuf> {
    let app_dir = dirs::data_dir()
        .context("No data directory is defined for this platform")?
        .join(APP_DIR);

    fs::create_dir_all(&app_dir)
        .with_context(|| format!("Cannot create data directory {}", app_dir.display()))?;

    Ok(app_dir)
}

/// Path of the configuration file, whether or not it exists.
///
/// # Errors
///
/// Same as [`get_data_dir`].
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}

/// Output format for CLI results.
///
/// Used both as the `--format` value and as `default_format` in the config
/// file, so the spelling is the same in both places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable listing
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Configuration for runtime behavior.
///
/// Missing fields take their [`Default`] values: the `library.db` file inside
/// [`get_data_dir`], and text output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Library database read when no snapshot is given on the command line
    pub db_path: PathBuf,
    /// Format used when `--format` is not passed
    pub default_format: OutputFormat,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            db_path: get_data_dir()
                .map(|dir| dir.join(DEFAULT_DB_FILE))
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_FILE)),
            default_format: OutputFormat::Text,
        }
    }
}

impl RuntimeConfig {
    /// Load `config.json` from the data directory, or defaults when absent.
    ///
    /// # Errors
    ///
    /// Fails when the data directory is unavailable or the file exists but
    /// cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Load configuration from an explicit file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files and invalid JSON. Unknown keys are ignored.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Create configuration with explicit database path.
    #[must_use]
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            db_path,
            ..Self::default()
        }
    }
}
