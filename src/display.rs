//! # Display Module
//!
//! Text rendering of lanes and duplicate groups for the terminal.
//!
//! Every renderer returns the complete text, newline-terminated, so the caller
//! decides where it goes (`print!` in the binary, assertions in tests). JSON
//! output goes through [`to_json`] instead and reuses the serde derives of the
//! result types.
//!
//! ## Track Lines
//!
//! Tracks are listed one per line as `position. artists - title (m:ss)`.
//! Tracks without artist information show `Unknown artist`.

use crate::duplicates::DuplicateGroup;
use crate::recommend::{Lane, LaneKind};
use crate::track::Track;
use anyhow::{Context, Result};

/// Formats a duration in milliseconds as `m:ss`.
///
/// Minutes are not wrapped into hours, so a one hour track shows as `60:00`.
/// Negative durations (broken tags) render as `0:00`.
#[must_use]
pub fn format_duration(duration_ms: i64) -> String {
    let total_seconds = duration_ms.max(0) / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn track_line(position: usize, track: &Track) -> String {
    let artists = track.display_artists();
    let artists = if artists.is_empty() { "Unknown artist".to_string() } else { artists };
    format!(
        "{position:>3}. {artists} - {} ({})",
        track.display_title(),
        format_duration(track.duration_ms)
    )
}

/// Joins rendered lines, terminating each with a newline.
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// Renders lanes in the order given, each headed by its summary and id.
///
/// # Examples
///
/// ```
/// use tracklanes::display::render_lanes;
///
/// assert_eq!(render_lanes(&[]), "No recommendations yet.\n");
/// ```
#[must_use]
pub fn render_lanes(lanes: &[Lane<'_>]) -> String {
    if lanes.is_empty() {
        return "No recommendations yet.\n".to_string();
    }

    let mut lines = Vec::new();
    for lane in lanes {
        lines.push(format!("== {} ({} tracks)", lane.kind.summary(), lane.tracks.len()));
        lines.push(format!("   [{}]", lane.id));
        lines.extend(lane.tracks.iter().enumerate().map(|(i, track)| track_line(i + 1, track)));
        lines.push(String::new());
    }
    join_lines(lines)
}

/// Renders duplicate groups with the duration and path of every copy.
#[must_use]
pub fn render_duplicates(groups: &[DuplicateGroup<'_>]) -> String {
    if groups.is_empty() {
        return "No duplicates found.\n".to_string();
    }

    let mut lines = vec![format!("{} duplicate groups", groups.len()), String::new()];
    for group in groups {
        lines.push(format!("== {} - {} ({} copies)", group.artists, group.title, group.tracks.len()));
        lines.extend(
            group
                .tracks
                .iter()
                .map(|track| format!("   {:>6}  {}", format_duration(track.duration_ms), track.path)),
        );
        lines.push(String::new());
    }
    join_lines(lines)
}

/// One line per lane kind: id, icon and summary.
#[must_use]
pub fn render_lane_catalog() -> String {
    join_lines(
        LaneKind::ALL
            .iter()
            .map(|kind| format!("{:<20} {:<24} {}", kind.id(), kind.icon(), kind.summary()))
            .collect(),
    )
}

/// Serialize any result set as pretty JSON.
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}
