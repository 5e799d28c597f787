//! Read-only snapshot loading.
//!
//! The library service owns the database; this module only reads it. Tracks are
//! "visible" when at least one folder holding them is shown in the collection.
//! Multi-valued columns (`Artists`, `Genres`) are stored `;`-delimited and are
//! split into the structured lists here, before any engine sees them.
//!
//! ## Schema
//!
//! Only three tables are read:
//! - `Track`: one row per file, with metadata and listening statistics
//! - `Folder`: library folders; `ShowInCollection = 1` marks visible ones
//! - `FolderTrack`: which folder holds which track
//!
//! Timestamps (`DateAdded`, `DateLastPlayed`) are stored as ticks, see
//! [`crate::track::ticks`].
//!
//! ## JSON Snapshots
//!
//! [`load_tracks_json`] reads the same records from a JSON array, for libraries
//! exported from another tool or written by hand for testing.

use crate::track::{split_delimited, Track};
use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, OpenFlags, Row};
use std::fs;
use std::path::Path;

const VISIBLE_TRACKS_QUERY: &str = "SELECT t.Path, t.FileName, t.TrackTitle, t.Artists, t.Genres, t.AlbumKey,
        t.Duration, t.DateAdded, t.DateLastPlayed, t.PlayCount, t.SkipCount,
        t.Rating, t.Love, t.BeatsPerMinute
     FROM Track t
     WHERE t.TrackID IN (
        SELECT ft.TrackID
        FROM FolderTrack ft
        INNER JOIN Folder f ON ft.FolderID = f.FolderID
        WHERE f.ShowInCollection = 1)
     ORDER BY t.TrackID";

/// Open the library database without write access.
///
/// # Errors
///
/// Fails when the file does not exist or is not an SQLite database. The file
/// is never created.
pub fn connect(db_path: &Path) -> Result<Connection> {
    Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        .with_context(|| format!("Failed to open library database at {}", db_path.display()))
}

/// All tracks visible in the collection, in `TrackID` order.
///
/// A track held by several folders is returned once, as long as any of them
/// is visible.
///
/// # Errors
///
/// Fails when the schema does not match (missing table or column) or a row
/// cannot be read.
pub fn retrieve_visible_tracks(conn: &Connection) -> Result<Vec<Track>> {
    let mut stmt = conn
        .prepare(VISIBLE_TRACKS_QUERY)
        .context("Invalid SQL statement when SELECTing visible tracks. Is this a library database?")?;

    let track_iter = stmt
        .query_map([], track_from_row)
        .context("Cannot query visible tracks.")?;

    let mut tracks = Vec::new();
    for track in track_iter {
        tracks.push(track.context("Failed to read track row.")?);
    }

    debug!("Retrieved {} visible tracks", tracks.len());
    Ok(tracks)
}

/// Open `db_path` and read the visible tracks.
pub fn load_visible_tracks(db_path: &Path) -> Result<Vec<Track>> {
    let conn = connect(db_path)?;
    let tracks = retrieve_visible_tracks(&conn)?;
    info!("Loaded {} tracks from {}", tracks.len(), db_path.display());
    Ok(tracks)
}

/// Read a JSON array of tracks (camelCase fields, all optional).
///
/// Unlike the database loader this keeps every record: a snapshot is assumed
/// to already contain only the visible tracks.
///
/// # Errors
///
/// Fails when the file cannot be read or is not a JSON array of track objects.
pub fn load_tracks_json(path: &Path) -> Result<Vec<Track>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read track snapshot {}", path.display()))?;
    let tracks: Vec<Track> = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid track snapshot JSON in {}", path.display()))?;
    info!("Loaded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks)
}

/// NULL numeric columns are read as zero.
fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    let artists = split_delimited(&row.get::<_, Option<String>>(3)?.unwrap_or_default());
    let genres = split_delimited(&row.get::<_, Option<String>>(4)?.unwrap_or_default());

    Ok(Track {
        path: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        file_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        title: row.get(2)?,
        artists: artists.join(", "),
        raw_artists: artists,
        genres: genres.join(", "),
        raw_genres: genres,
        album_key: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        duration_ms: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
        date_added: row.get::<_, Option<i64>>(7)?.unwrap_or(0),
        date_last_played: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
        play_count: count_column(row, 9)?,
        skip_count: count_column(row, 10)?,
        rating: u8::try_from(row.get::<_, Option<i64>>(11)?.unwrap_or(0).clamp(0, 5)).unwrap_or(0),
        love: i32::try_from(row.get::<_, Option<i64>>(12)?.unwrap_or(0)).unwrap_or(0),
        beats_per_minute: count_column(row, 13)?,
    })
}

/// Non-negative integer column; NULL and negative values become 0.
fn count_column(row: &Row<'_>, index: usize) -> rusqlite::Result<u32> {
    let value = row.get::<_, Option<i64>>(index)?.unwrap_or(0);
    Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
}
