//! Duplicate track detection.
//!
//! Two passes: tracks are first grouped by a rough `(title, artist)` key
//! (lower-cased and trimmed, nothing else), then every rough group is split
//! into runs whose consecutive durations differ by at most
//! [`DURATION_TOLERANCE_MS`]. The split chains: A–B and B–C within tolerance
//! keeps A and C together even when A–C is not.

use crate::track::Track;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Largest duration gap between neighbouring tracks of one group.
pub const DURATION_TOLERANCE_MS: u64 = 2000;

/// Tracks that look like the same recording.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup<'a> {
    pub title: String,
    pub artists: String,
    /// Ordered by duration, shortest first.
    pub tracks: Vec<&'a Track>,
}

type RoughKey = (String, String);

fn rough_key(track: &Track) -> RoughKey {
    let title = match track.title.as_deref() {
        Some(title) if !title.is_empty() => title,
        _ => track.file_name.as_str(),
    };
    (
        title.trim().to_lowercase(),
        track.display_artists().trim().to_lowercase(),
    )
}

/// Partition `snapshot` into groups of probable duplicates.
///
/// Groups come out in the order their first track appears in the snapshot.
#[must_use]
pub fn detect_duplicates(snapshot: &[Track]) -> Vec<DuplicateGroup<'_>> {
    let mut index: HashMap<RoughKey, usize> = HashMap::new();
    let mut rough_groups: Vec<Vec<&Track>> = Vec::new();

    for track in snapshot {
        let slot = *index.entry(rough_key(track)).or_insert_with(|| {
            rough_groups.push(Vec::new());
            rough_groups.len() - 1
        });
        rough_groups[slot].push(track);
    }

    let groups: Vec<DuplicateGroup<'_>> = rough_groups
        .into_iter()
        .filter(|group| group.len() >= 2)
        .flat_map(split_by_duration)
        .filter(|group| group.len() >= 2)
        .map(|tracks| DuplicateGroup {
            title: tracks[0].display_title().to_string(),
            artists: tracks[0].display_artists(),
            tracks,
        })
        .collect();

    debug!("Found {} duplicate groups among {} tracks", groups.len(), snapshot.len());
    groups
}

/// Chain-split tracks sorted by duration wherever the gap exceeds the tolerance.
fn split_by_duration(mut tracks: Vec<&Track>) -> Vec<Vec<&Track>> {
    tracks.sort_by_key(|track| track.duration_ms);

    let mut runs: Vec<Vec<&Track>> = Vec::new();
    let mut previous: Option<i64> = None;

    for track in tracks {
        let continues = previous
            .is_some_and(|duration| track.duration_ms.abs_diff(duration) <= DURATION_TOLERANCE_MS);
        match runs.last_mut() {
            Some(run) if continues => run.push(track),
            _ => runs.push(vec![track]),
        }
        previous = Some(track.duration_ms);
    }

    runs
}
