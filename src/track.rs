//! Track records as the engines see them.
//!
//! A [`Track`] is a read-only snapshot row handed over by the library service.
//! Multi-valued fields (artists, genres) may arrive either as a structured list
//! or only as a display string; [`Track::artist_names`] and
//! [`Track::genre_names`] resolve that once, the same way everywhere.

use serde::{Deserialize, Serialize};

/// One library track, as stored by the library service.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Track {
    /// Absolute file path. Used to find the currently playing track.
    pub path: String,
    pub file_name: String,
    /// Tag title. `None` or blank means "use the file name".
    pub title: Option<String>,
    /// Structured artist list.
    pub raw_artists: Vec<String>,
    /// Artist display string, e.g. `"Artist A, Artist B"`.
    pub artists: String,
    pub raw_genres: Vec<String>,
    pub genres: String,
    pub album_key: String,
    pub duration_ms: i64,
    /// Ticks (see [`ticks`]). 0 = unknown.
    pub date_added: i64,
    /// Ticks. 0 = never played.
    pub date_last_played: i64,
    pub play_count: u32,
    pub skip_count: u32,
    /// 0..=5
    pub rating: u8,
    /// Anything above zero counts as loved.
    pub love: i32,
    /// 0 = unknown tempo.
    pub beats_per_minute: u32,
}

impl Track {
    /// Title shown to the user: the tag title, or the file name when untagged.
    #[must_use]
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => &self.file_name,
        }
    }

    /// Artist string shown to the user.
    #[must_use]
    pub fn display_artists(&self) -> String {
        if self.artists.trim().is_empty() {
            self.raw_artists.join(", ")
        } else {
            self.artists.clone()
        }
    }

    /// Artists of this track, structured list first, display string second.
    #[must_use]
    pub fn artist_names(&self) -> Vec<&str> {
        multi_value(&self.raw_artists, &self.artists)
    }

    /// Genres of this track, resolved like [`Track::artist_names`].
    #[must_use]
    pub fn genre_names(&self) -> Vec<&str> {
        multi_value(&self.raw_genres, &self.genres)
    }

    #[must_use]
    pub const fn is_loved(&self) -> bool {
        self.love > 0
    }

    #[must_use]
    pub const fn has_tempo(&self) -> bool {
        self.beats_per_minute > 0
    }
}

fn multi_value<'a>(list: &'a [String], display: &'a str) -> Vec<&'a str> {
    let values: Vec<&str> = list
        .iter()
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
        .collect();

    match (values.is_empty(), display.trim().is_empty()) {
        (false, _) => values,
        (true, false) => vec![display],
        (true, true) => Vec::new(),
    }
}

/// Split a `;`-delimited database column (`";Artist A;;Artist B;"`) into its values.
#[must_use]
pub fn split_delimited(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Timestamp helpers.
///
/// Library timestamps are stored as ticks: 100-nanosecond intervals since
/// 0001-01-01T00:00:00Z. Every threshold the engines compute uses the same unit.
pub mod ticks {
    use std::time::{SystemTime, UNIX_EPOCH};

    pub const TICKS_PER_MILLISECOND: i64 = 10_000;
    pub const TICKS_PER_SECOND: i64 = 1_000 * TICKS_PER_MILLISECOND;
    pub const TICKS_PER_DAY: i64 = 24 * 60 * 60 * TICKS_PER_SECOND;
    /// Ticks between 0001-01-01 and the Unix epoch.
    pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

    /// Convert Unix milliseconds to ticks.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> i64 {
        millis * TICKS_PER_MILLISECOND + UNIX_EPOCH_TICKS
    }

    /// Convert ticks back to Unix milliseconds.
    #[must_use]
    pub const fn to_unix_millis(ticks: i64) -> i64 {
        (ticks - UNIX_EPOCH_TICKS) / TICKS_PER_MILLISECOND
    }

    #[must_use]
    pub const fn days(count: i64) -> i64 {
        count * TICKS_PER_DAY
    }

    /// Current wall-clock time in ticks.
    #[must_use]
    pub fn now() -> i64 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|elapsed| i64::try_from(elapsed.as_millis()).ok())
            .unwrap_or(0);
        from_unix_millis(millis)
    }
}
