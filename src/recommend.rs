//! Recommendation lanes.
//!
//! Every lane is an independent ranking over the same snapshot: its own filter,
//! its own ordering, its own cutoff. [`generate_all_recommendations`] runs them
//! in a fixed order and drops the empty ones.
//!
//! Artist and genre lists are resolved and lower-cased once per track when the
//! [`LibraryView`] is built, so all lanes agree on what a track's artists are.
//!
//! ```
//! use tracklanes::recommend::generate_all_recommendations;
//! use tracklanes::shuffle::RandomShuffler;
//! use tracklanes::track::{ticks, Track};
//!
//! let library = vec![Track {
//!     title: Some("Blue in Green".to_string()),
//!     artists: "Miles Davis".to_string(),
//!     date_added: ticks::from_unix_millis(1_600_000_000_000),
//!     ..Default::default()
//! }];
//!
//! let mut shuffler = RandomShuffler::seeded(1);
//! let lanes = generate_all_recommendations(&library, None, ticks::now(), &mut shuffler);
//! assert_eq!(lanes[0].id, "fresh-finds");
//! ```

use crate::shuffle::Shuffler;
use crate::track::{ticks, Track};
use log::{debug, trace};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Most tracks a lane ever carries.
pub const LANE_SIZE: usize = 25;

const RECENT_WINDOW: usize = 50;
const TOP_ARTIST_COUNT: usize = 10;
const DEEP_CUT_MAX_PLAYS: u32 = 2;
const REDISCOVER_MIN_PLAYS: u32 = 3;
/// Days after which a track counts as "a while ago".
const FORGOTTEN_AFTER_DAYS: i64 = 30;
const LOVED_MIN_RATING: u8 = 4;
const SKIP_FREE_MIN_PLAYS: u32 = 2;
const MIN_EXPLORER_GENRES: usize = 2;
const TEMPO_WINDOW: usize = 20;
const BPM_RANGE: u32 = 15;
const SEED_ARTIST_COUNT: usize = 5;

/// The ten lanes, in the order they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    FreshFinds,
    RecentlyPlayedMix,
    DeepCuts,
    Rediscover,
    LovedAndRated,
    SkipFreeZone,
    HiddenGems,
    GenreExplorer,
    TempoMatch,
    ArtistDna,
}

impl LaneKind {
    pub const ALL: [Self; 10] = [
        Self::FreshFinds,
        Self::RecentlyPlayedMix,
        Self::DeepCuts,
        Self::Rediscover,
        Self::LovedAndRated,
        Self::SkipFreeZone,
        Self::HiddenGems,
        Self::GenreExplorer,
        Self::TempoMatch,
        Self::ArtistDna,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FreshFinds => "fresh-finds",
            Self::RecentlyPlayedMix => "recently-played-mix",
            Self::DeepCuts => "deep-cuts",
            Self::Rediscover => "rediscover",
            Self::LovedAndRated => "loved-and-rated",
            Self::SkipFreeZone => "skip-free-zone",
            Self::HiddenGems => "hidden-gems",
            Self::GenreExplorer => "genre-explorer",
            Self::TempoMatch => "tempo-match",
            Self::ArtistDna => "artist-dna",
        }
    }

    /// Localization key of the lane title.
    #[must_use]
    pub const fn title_key(self) -> &'static str {
        match self {
            Self::FreshFinds => "recommendations-fresh-finds",
            Self::RecentlyPlayedMix => "recommendations-recently-played-mix",
            Self::DeepCuts => "recommendations-deep-cuts",
            Self::Rediscover => "recommendations-rediscover",
            Self::LovedAndRated => "recommendations-loved-and-rated",
            Self::SkipFreeZone => "recommendations-skip-free-zone",
            Self::HiddenGems => "recommendations-hidden-gems",
            Self::GenreExplorer => "recommendations-genre-explorer",
            Self::TempoMatch => "recommendations-tempo-match",
            Self::ArtistDna => "recommendations-artist-dna",
        }
    }

    /// Localization key of the lane description.
    #[must_use]
    pub const fn description_key(self) -> &'static str {
        match self {
            Self::FreshFinds => "recommendations-fresh-finds-description",
            Self::RecentlyPlayedMix => "recommendations-recently-played-mix-description",
            Self::DeepCuts => "recommendations-deep-cuts-description",
            Self::Rediscover => "recommendations-rediscover-description",
            Self::LovedAndRated => "recommendations-loved-and-rated-description",
            Self::SkipFreeZone => "recommendations-skip-free-zone-description",
            Self::HiddenGems => "recommendations-hidden-gems-description",
            Self::GenreExplorer => "recommendations-genre-explorer-description",
            Self::TempoMatch => "recommendations-tempo-match-description",
            Self::ArtistDna => "recommendations-artist-dna-description",
        }
    }

    /// Icon class name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::FreshFinds => "las la-seedling",
            Self::RecentlyPlayedMix => "las la-history",
            Self::DeepCuts => "las la-gem",
            Self::Rediscover => "las la-undo-alt",
            Self::LovedAndRated => "las la-heart",
            Self::SkipFreeZone => "las la-check-circle",
            Self::HiddenGems => "las la-star",
            Self::GenreExplorer => "las la-compass",
            Self::TempoMatch => "las la-tachometer-alt",
            Self::ArtistDna => "las la-dna",
        }
    }

    /// Plain English summary, for terminals that have no localization table.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::FreshFinds => "Recently added tracks you haven't played yet",
            Self::RecentlyPlayedMix => "Unplayed tracks by artists you listened to lately",
            Self::DeepCuts => "Lesser-played tracks from your most-played artists",
            Self::Rediscover => "Old favorites you haven't played in a while",
            Self::LovedAndRated => "A mix of loved and highly rated tracks",
            Self::SkipFreeZone => "Tracks you rarely skip",
            Self::HiddenGems => "Tracks that have sat in your library unplayed",
            Self::GenreExplorer => "Tracks from your least-listened genres",
            Self::TempoMatch => "Tracks with a tempo close to what's playing",
            Self::ArtistDna => "Other artists sharing genres with your favorites",
        }
    }
}

/// One computed lane. Track order is the ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lane<'a> {
    #[serde(skip)]
    pub kind: LaneKind,
    pub id: &'static str,
    pub title_key: &'static str,
    pub description_key: &'static str,
    pub icon: &'static str,
    pub tracks: Vec<&'a Track>,
}

impl<'a> Lane<'a> {
    #[must_use]
    pub fn new(kind: LaneKind, tracks: Vec<&'a Track>) -> Self {
        Self {
            kind,
            id: kind.id(),
            title_key: kind.title_key(),
            description_key: kind.description_key(),
            icon: kind.icon(),
            tracks,
        }
    }
}

/// A track together with its lower-cased artist and genre keys.
#[derive(Debug, Clone)]
pub struct LibraryEntry<'a> {
    pub track: &'a Track,
    pub artists: Vec<String>,
    pub genres: Vec<String>,
}

impl<'a> LibraryEntry<'a> {
    fn new(track: &'a Track) -> Self {
        Self {
            track,
            artists: track.artist_names().into_iter().map(str::to_lowercase).collect(),
            genres: track.genre_names().into_iter().map(str::to_lowercase).collect(),
        }
    }

    fn has_artist_in(&self, set: &HashSet<&str>) -> bool {
        self.artists.iter().any(|artist| set.contains(artist.as_str()))
    }

    fn has_genre_in(&self, set: &HashSet<&str>) -> bool {
        self.genres.iter().any(|genre| set.contains(genre.as_str()))
    }
}

/// The snapshot after multi-value normalization. Built once per call.
#[derive(Debug, Clone)]
pub struct LibraryView<'a> {
    entries: Vec<LibraryEntry<'a>>,
}

impl<'a> LibraryView<'a> {
    #[must_use]
    pub fn new(snapshot: &'a [Track]) -> Self {
        Self {
            entries: snapshot.iter().map(LibraryEntry::new).collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[LibraryEntry<'a>] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tracks(&self) -> impl Iterator<Item = &'a Track> + '_ {
        self.entries.iter().map(|entry| entry.track)
    }

    fn artist_play_counts(&self) -> Tally<'_> {
        let mut tally = Tally::default();
        for entry in &self.entries {
            for artist in &entry.artists {
                tally.add(artist, entry.track.play_count);
            }
        }
        tally
    }

    fn genre_play_counts(&self) -> Tally<'_> {
        let mut tally = Tally::default();
        for entry in &self.entries {
            for genre in &entry.genres {
                tally.add(genre, entry.track.play_count);
            }
        }
        tally
    }

    /// Played tracks, most recently played first.
    fn recently_played(&self) -> Vec<&LibraryEntry<'a>> {
        let mut played: Vec<&LibraryEntry<'a>> = self
            .entries
            .iter()
            .filter(|entry| entry.track.date_last_played > 0)
            .collect();
        played.sort_by(|a, b| b.track.date_last_played.cmp(&a.track.date_last_played));
        played
    }
}

/// Play counts accumulated per key. Keys keep first-seen order so that
/// equal totals rank deterministically.
#[derive(Debug, Default)]
struct Tally<'k> {
    totals: Vec<(&'k str, u64)>,
    index: HashMap<&'k str, usize>,
}

impl<'k> Tally<'k> {
    fn add(&mut self, key: &'k str, plays: u32) {
        let slot = *self.index.entry(key).or_insert_with(|| {
            self.totals.push((key, 0));
            self.totals.len() - 1
        });
        self.totals[slot].1 += u64::from(plays);
    }

    fn len(&self) -> usize {
        self.totals.len()
    }

    fn total(&self) -> u64 {
        self.totals.iter().map(|(_, plays)| plays).sum()
    }

    fn most_played(&self) -> Vec<(&'k str, u64)> {
        let mut ranked = self.totals.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    fn least_played(&self) -> Vec<(&'k str, u64)> {
        let mut ranked = self.totals.clone();
        ranked.sort_by_key(|(_, plays)| *plays);
        ranked
    }

    /// The `count` most played keys, whatever their totals.
    fn top(&self, count: usize) -> HashSet<&'k str> {
        self.most_played().into_iter().take(count).map(|(key, _)| key).collect()
    }

    /// The `count` most played keys that have any plays at all.
    fn top_played(&self, count: usize) -> HashSet<&'k str> {
        self.most_played()
            .into_iter()
            .filter(|(_, plays)| *plays > 0)
            .take(count)
            .map(|(key, _)| key)
            .collect()
    }
}

fn capped(mut tracks: Vec<&Track>) -> Vec<&Track> {
    tracks.truncate(LANE_SIZE);
    tracks
}

fn forgotten_threshold(now: i64) -> i64 {
    now.saturating_sub(ticks::days(FORGOTTEN_AFTER_DAYS))
}

/// Compute every non-empty lane for `snapshot`.
///
/// `currently_playing` is compared by identity, so pass a reference into
/// `snapshot` if the playing track should be left out of Tempo Match. `now` is
/// in ticks. Shuffled lanes draw from `shuffler` in lane order, so a seeded
/// shuffler reproduces the same output for the same snapshot.
#[must_use]
pub fn generate_all_recommendations<'a, S: Shuffler>(
    snapshot: &'a [Track],
    currently_playing: Option<&Track>,
    now: i64,
    shuffler: &mut S,
) -> Vec<Lane<'a>> {
    if snapshot.is_empty() {
        debug!("Empty snapshot, no recommendations");
        return Vec::new();
    }

    let view = LibraryView::new(snapshot);

    let computed = [
        (LaneKind::FreshFinds, fresh_finds(&view)),
        (LaneKind::RecentlyPlayedMix, recently_played_mix(&view, shuffler)),
        (LaneKind::DeepCuts, deep_cuts(&view)),
        (LaneKind::Rediscover, rediscover(&view, now)),
        (LaneKind::LovedAndRated, loved_and_rated(&view, shuffler)),
        (LaneKind::SkipFreeZone, skip_free_zone(&view)),
        (LaneKind::HiddenGems, hidden_gems(&view, now, shuffler)),
        (LaneKind::GenreExplorer, genre_explorer(&view, shuffler)),
        (LaneKind::TempoMatch, tempo_match(&view, currently_playing)),
        (LaneKind::ArtistDna, artist_dna(&view)),
    ];

    let lanes: Vec<Lane<'a>> = computed
        .into_iter()
        .filter_map(|(kind, tracks)| {
            debug!("Lane `{}': {} tracks", kind.id(), tracks.len());
            (!tracks.is_empty()).then(|| Lane::new(kind, tracks))
        })
        .collect();

    debug!("Generated {} lanes from {} tracks", lanes.len(), snapshot.len());
    lanes
}

/// Unplayed tracks, newest additions first.
#[must_use]
pub fn fresh_finds<'a>(view: &LibraryView<'a>) -> Vec<&'a Track> {
    let mut unplayed: Vec<&Track> = view
        .tracks()
        .filter(|track| track.play_count == 0 && track.date_added > 0)
        .collect();
    unplayed.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    capped(unplayed)
}

/// Unplayed tracks by the artists of the 50 most recently played tracks.
#[must_use]
pub fn recently_played_mix<'a>(view: &LibraryView<'a>, shuffler: &mut impl Shuffler) -> Vec<&'a Track> {
    let recent_artists: HashSet<&str> = view
        .recently_played()
        .into_iter()
        .take(RECENT_WINDOW)
        .flat_map(|entry| entry.artists.iter().map(String::as_str))
        .collect();

    if recent_artists.is_empty() {
        return Vec::new();
    }

    let mut mix: Vec<&Track> = view
        .entries()
        .iter()
        .filter(|entry| entry.track.play_count == 0 && entry.has_artist_in(&recent_artists))
        .map(|entry| entry.track)
        .collect();

    shuffler.shuffle(&mut mix);
    capped(mix)
}

/// Barely played tracks (at most two plays) of the ten most played artists.
///
/// With fewer than ten artists in the library every artist counts as a top
/// artist. Empty when nothing has been played yet.
#[must_use]
pub fn deep_cuts<'a>(view: &LibraryView<'a>) -> Vec<&'a Track> {
    let counts = view.artist_play_counts();
    if counts.total() == 0 {
        return Vec::new();
    }

    let top_artists = counts.top(TOP_ARTIST_COUNT);
    trace!("Top artists: {top_artists:?}");

    let mut cuts: Vec<&Track> = view
        .entries()
        .iter()
        .filter(|entry| entry.track.play_count <= DEEP_CUT_MAX_PLAYS && entry.has_artist_in(&top_artists))
        .map(|entry| entry.track)
        .collect();

    cuts.sort_by_key(|track| track.play_count);
    capped(cuts)
}

/// Former favorites (three plays or more) not played in the last 30 days.
///
/// Ranked by `play_count * (threshold - date_last_played)`, so both heavy
/// rotation and long absence push a track up.
#[must_use]
pub fn rediscover<'a>(view: &LibraryView<'a>, now: i64) -> Vec<&'a Track> {
    let threshold = forgotten_threshold(now);

    let mut forgotten: Vec<(&Track, i128)> = view
        .tracks()
        .filter(|track| {
            track.play_count >= REDISCOVER_MIN_PLAYS
                && track.date_last_played > 0
                && track.date_last_played < threshold
        })
        .map(|track| {
            let absence = i128::from(threshold) - i128::from(track.date_last_played);
            (track, i128::from(track.play_count) * absence)
        })
        .collect();

    forgotten.sort_by(|a, b| b.1.cmp(&a.1));
    capped(forgotten.into_iter().map(|(track, _)| track).collect())
}

/// Loved or highly rated tracks, shuffled.
#[must_use]
pub fn loved_and_rated<'a>(view: &LibraryView<'a>, shuffler: &mut impl Shuffler) -> Vec<&'a Track> {
    let mut loved: Vec<&Track> = view
        .tracks()
        .filter(|track| track.is_loved() || track.rating >= LOVED_MIN_RATING)
        .collect();
    shuffler.shuffle(&mut loved);
    capped(loved)
}

/// Played tracks with the lowest skip ratio; more plays wins a tie.
#[must_use]
pub fn skip_free_zone<'a>(view: &LibraryView<'a>) -> Vec<&'a Track> {
    let mut played: Vec<&Track> = view
        .tracks()
        .filter(|track| track.play_count >= SKIP_FREE_MIN_PLAYS)
        .collect();
    played.sort_by(|a, b| compare_skip_ratio(a, b).then_with(|| b.play_count.cmp(&a.play_count)));
    capped(played)
}

/// `a.skips / a.plays` against `b.skips / b.plays`, compared exactly.
fn compare_skip_ratio(a: &Track, b: &Track) -> Ordering {
    let a_plays = u64::from(a.play_count.max(1));
    let b_plays = u64::from(b.play_count.max(1));
    (u64::from(a.skip_count) * b_plays).cmp(&(u64::from(b.skip_count) * a_plays))
}

/// Never played tracks added more than 30 days ago, shuffled.
#[must_use]
pub fn hidden_gems<'a>(view: &LibraryView<'a>, now: i64, shuffler: &mut impl Shuffler) -> Vec<&'a Track> {
    let threshold = forgotten_threshold(now);
    let mut gems: Vec<&Track> = view
        .tracks()
        .filter(|track| track.play_count == 0 && track.date_added > 0 && track.date_added < threshold)
        .collect();
    shuffler.shuffle(&mut gems);
    capped(gems)
}

/// Tracks from the least played 30% of genres (at least two), shuffled.
///
/// Empty when the library has fewer than two genres, or no genre has been
/// played at all.
#[must_use]
pub fn genre_explorer<'a>(view: &LibraryView<'a>, shuffler: &mut impl Shuffler) -> Vec<&'a Track> {
    let counts = view.genre_play_counts();
    if counts.len() < MIN_EXPLORER_GENRES || counts.total() == 0 {
        return Vec::new();
    }

    let take = (counts.len() * 3 / 10).max(MIN_EXPLORER_GENRES);
    let least_played: HashSet<&str> = counts
        .least_played()
        .into_iter()
        .take(take)
        .map(|(genre, _)| genre)
        .collect();
    trace!("Least played genres: {least_played:?}");

    let mut explorer: Vec<&Track> = view
        .entries()
        .iter()
        .filter(|entry| entry.has_genre_in(&least_played))
        .map(|entry| entry.track)
        .collect();

    shuffler.shuffle(&mut explorer);
    capped(explorer)
}

/// Tracks within 15 BPM of the reference tempo, closest first.
///
/// The reference is the playing track's tempo, or else the first known tempo
/// among the 20 most recently played tracks. The playing track itself is
/// excluded by identity.
#[must_use]
pub fn tempo_match<'a>(view: &LibraryView<'a>, currently_playing: Option<&Track>) -> Vec<&'a Track> {
    let Some(reference) = reference_tempo(view, currently_playing) else {
        trace!("No reference tempo, skipping tempo match");
        return Vec::new();
    };
    trace!("Reference tempo: {reference} BPM");

    let is_playing = |track: &Track| currently_playing.is_some_and(|playing| std::ptr::eq(playing, track));

    let mut matched: Vec<&Track> = view
        .tracks()
        .filter(|track| {
            track.has_tempo() && track.beats_per_minute.abs_diff(reference) <= BPM_RANGE && !is_playing(track)
        })
        .collect();

    matched.sort_by_key(|track| track.beats_per_minute.abs_diff(reference));
    capped(matched)
}

fn reference_tempo(view: &LibraryView<'_>, currently_playing: Option<&Track>) -> Option<u32> {
    if let Some(playing) = currently_playing.filter(|track| track.has_tempo()) {
        return Some(playing.beats_per_minute);
    }

    let mut played: Vec<&Track> = view.tracks().filter(|track| track.play_count > 0).collect();
    played.sort_by(|a, b| b.date_last_played.cmp(&a.date_last_played));
    played
        .into_iter()
        .take(TEMPO_WINDOW)
        .find(|track| track.has_tempo())
        .map(|track| track.beats_per_minute)
}

/// Tracks by other artists that share genres with the five most played artists.
///
/// Most played first, one entry per (title, artist).
#[must_use]
pub fn artist_dna<'a>(view: &LibraryView<'a>) -> Vec<&'a Track> {
    let counts = view.artist_play_counts();
    let mut artist_genres: HashMap<&str, HashSet<&str>> = HashMap::new();
    for entry in view.entries() {
        for artist in &entry.artists {
            artist_genres
                .entry(artist.as_str())
                .or_default()
                .extend(entry.genres.iter().map(String::as_str));
        }
    }

    let seed_artists = counts.top_played(SEED_ARTIST_COUNT);
    if seed_artists.is_empty() {
        return Vec::new();
    }

    let seed_genres: HashSet<&str> = seed_artists
        .iter()
        .filter_map(|artist| artist_genres.get(artist))
        .flatten()
        .copied()
        .collect();
    trace!("Seed artists {seed_artists:?}, seed genres {seed_genres:?}");

    let mut cross: Vec<&Track> = view
        .entries()
        .iter()
        .filter(|entry| !entry.has_artist_in(&seed_artists) && entry.has_genre_in(&seed_genres))
        .map(|entry| entry.track)
        .collect();
    cross.sort_by(|a, b| b.play_count.cmp(&a.play_count));

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let deduped: Vec<&Track> = cross
        .into_iter()
        .filter(|track| {
            seen.insert((
                track.display_title().to_lowercase(),
                track.display_artists().to_lowercase(),
            ))
        })
        .collect();

    capped(deduped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shuffle::{KeepOrder, RandomShuffler};

    const NOW: i64 = ticks::from_unix_millis(1_700_000_000_000);

    fn days_ago(days: i64) -> i64 {
        NOW - ticks::days(days)
    }

    fn song(title: &str, artist: &str) -> Track {
        Track {
            path: format!("/music/{artist}/{title}.flac"),
            file_name: format!("{title}.flac"),
            title: Some(title.to_string()),
            artists: artist.to_string(),
            duration_ms: 200_000,
            date_added: days_ago(60),
            ..Default::default()
        }
    }

    fn played(title: &str, artist: &str, plays: u32, last_played_days_ago: i64) -> Track {
        Track {
            play_count: plays,
            date_last_played: days_ago(last_played_days_ago),
            ..song(title, artist)
        }
    }

    fn titles(tracks: &[&Track]) -> Vec<String> {
        tracks.iter().map(|track| track.display_title().to_string()).collect()
    }

    fn ids(lanes: &[Lane<'_>]) -> Vec<&'static str> {
        lanes.iter().map(|lane| lane.id).collect()
    }

    #[test]
    fn test_empty_snapshot_yields_no_lanes() {
        let lanes = generate_all_recommendations(&[], None, NOW, &mut KeepOrder);
        assert!(lanes.is_empty());
    }

    #[test]
    fn test_fresh_finds_newest_first_and_capped() {
        let mut library: Vec<Track> = (0..30)
            .map(|i| Track {
                date_added: days_ago(i),
                ..song(&format!("New {i}"), "Artist")
            })
            .collect();
        library.push(Track { date_added: 0, ..song("Undated", "Artist") });
        library.push(Track { date_added: days_ago(0) + 1, ..played("Heard", "Artist", 1, 1) });

        let view = LibraryView::new(&library);
        let fresh = fresh_finds(&view);

        assert_eq!(fresh.len(), LANE_SIZE);
        assert!(fresh.iter().all(|track| track.play_count == 0 && track.date_added > 0));
        assert!(fresh.windows(2).all(|pair| pair[0].date_added >= pair[1].date_added));
        assert_eq!(fresh[0].display_title(), "New 0");
    }

    #[test]
    fn test_recently_played_mix_matches_artists_case_insensitively() {
        let library = vec![
            played("Heard", "The Band", 4, 1),
            song("Unheard", "the band"),
            song("Stranger", "Someone Else"),
            played("Also Heard", "The Band", 1, 2),
        ];

        let view = LibraryView::new(&library);
        let mix = recently_played_mix(&view, &mut KeepOrder);

        assert_eq!(titles(&mix), vec!["Unheard"]);
    }

    #[test]
    fn test_recently_played_mix_only_looks_at_fifty_latest() {
        let mut library: Vec<Track> = (0..50)
            .map(|i| played(&format!("Recent {i}"), "Current", 1, i + 1))
            .collect();
        library.push(played("Old", "Forgotten", 9, 400));
        library.push(song("Unplayed old", "Forgotten"));
        library.push(song("Unplayed current", "Current"));

        let view = LibraryView::new(&library);
        let mix = recently_played_mix(&view, &mut KeepOrder);

        assert_eq!(titles(&mix), vec!["Unplayed current"]);
    }

    #[test]
    fn test_deep_cuts_from_top_artists() {
        let library = vec![
            played("Hit", "Star", 50, 1),
            played("B-side", "Star", 2, 5),
            song("Unheard", "Star"),
            played("Album track", "Star", 3, 5),
            song("Nobody", "Obscure"),
        ];

        let view = LibraryView::new(&library);
        let cuts = deep_cuts(&view);

        // Obscure is one of only two artists, so it ranks among the top ten.
        assert_eq!(titles(&cuts), vec!["Unheard", "Nobody", "B-side"]);
        assert!(cuts.iter().all(|track| track.play_count <= DEEP_CUT_MAX_PLAYS));
    }

    #[test]
    fn test_deep_cuts_includes_unplayed_artists_in_small_library() {
        let library = vec![played("Hit", "Star", 50, 1), song("Quiet", "Other")];

        let view = LibraryView::new(&library);
        assert_eq!(titles(&deep_cuts(&view)), vec!["Quiet"]);
    }

    #[test]
    fn test_deep_cuts_empty_without_any_plays() {
        let library = vec![song("Quiet", "Other"), song("Silent", "Star")];

        let view = LibraryView::new(&library);
        assert!(deep_cuts(&view).is_empty());
    }

    #[test]
    fn test_deep_cuts_limited_to_ten_artists() {
        let mut library: Vec<Track> = (0..11u32)
            .map(|i| played(&format!("Hit {i}"), &format!("Artist {i}"), 100 - i, 1))
            .collect();
        library.push(song("Cut of the 10th", "Artist 9"));
        library.push(song("Cut of the 11th", "Artist 10"));

        let view = LibraryView::new(&library);
        let cuts = deep_cuts(&view);

        assert_eq!(titles(&cuts), vec!["Cut of the 10th"]);
    }

    #[test]
    fn test_rediscover_threshold_and_score() {
        let library = vec![
            played("Long gone", "A", 3, 300),
            played("Heavy rotation", "B", 40, 60),
            played("Too recent", "C", 50, 29),
            played("Exactly 30 days", "D", 50, 30),
            played("Too few plays", "E", 2, 300),
            Track { date_last_played: 0, ..played("Never played", "F", 10, 0) },
        ];

        let view = LibraryView::new(&library);
        let forgotten = rediscover(&view, NOW);

        // Heavy rotation: 40 * 30 days, Long gone: 3 * 270 days.
        assert_eq!(titles(&forgotten), vec!["Heavy rotation", "Long gone"]);
        let threshold = NOW - ticks::days(30);
        assert!(forgotten.iter().all(|track| track.play_count >= 3 && track.date_last_played < threshold));
    }

    #[test]
    fn test_rediscover_survives_extreme_values() {
        let library = vec![Track {
            play_count: u32::MAX,
            date_last_played: 1,
            ..song("Ancient", "A")
        }];

        let view = LibraryView::new(&library);
        assert_eq!(rediscover(&view, i64::MAX).len(), 1);
        assert!(rediscover(&view, i64::MIN).is_empty());
    }

    #[test]
    fn test_loved_and_rated() {
        let library = vec![
            Track { love: 1, ..song("Loved", "A") },
            Track { rating: 4, ..song("Rated", "A") },
            Track { rating: 3, ..song("Meh", "A") },
            Track { love: -1, ..song("Banned", "A") },
        ];

        let view = LibraryView::new(&library);
        let mut loved = titles(&loved_and_rated(&view, &mut RandomShuffler::seeded(3)));
        loved.sort();

        assert_eq!(loved, vec!["Loved", "Rated"]);
    }

    #[test]
    fn test_skip_free_zone_ratio_then_plays() {
        let library = vec![
            Track { skip_count: 5, ..played("Skippy", "A", 10, 1) },
            Track { skip_count: 0, ..played("Clean few", "A", 2, 1) },
            Track { skip_count: 0, ..played("Clean many", "A", 20, 1) },
            Track { skip_count: 1, ..played("One in four", "A", 4, 1) },
            Track { skip_count: 2, ..played("Two in eight", "A", 8, 1) },
            Track { skip_count: 0, ..played("Once", "A", 1, 1) },
        ];

        let view = LibraryView::new(&library);
        let zone = skip_free_zone(&view);

        assert_eq!(
            titles(&zone),
            vec!["Clean many", "Clean few", "Two in eight", "One in four", "Skippy"]
        );
    }

    #[test]
    fn test_hidden_gems_strictly_older_than_threshold() {
        let library = vec![
            Track { date_added: days_ago(31), ..song("Old", "A") },
            Track { date_added: days_ago(30), ..song("Boundary", "A") },
            Track { date_added: days_ago(2), ..song("New", "A") },
            Track { date_added: days_ago(90), ..played("Played", "A", 1, 3) },
        ];

        let view = LibraryView::new(&library);
        assert_eq!(titles(&hidden_gems(&view, NOW, &mut KeepOrder)), vec!["Old"]);
    }

    #[test]
    fn test_genre_explorer_needs_two_genres() {
        let library = vec![
            Track { genres: "Rock".to_string(), ..played("A", "X", 3, 1) },
            Track { genres: "rock".to_string(), ..song("B", "Y") },
        ];

        let view = LibraryView::new(&library);
        assert!(genre_explorer(&view, &mut KeepOrder).is_empty());
    }

    #[test]
    fn test_genre_explorer_picks_least_played_genres() {
        let genres = ["Rock", "Pop", "Jazz", "Folk", "Metal", "Blues", "Soul", "Funk", "Disco", "Ska"];
        let library: Vec<Track> = genres
            .iter()
            .enumerate()
            .map(|(i, genre)| Track {
                raw_genres: vec![(*genre).to_string()],
                ..played(genre, "Artist", 10 * (i as u32 + 1), 1)
            })
            .collect();

        let view = LibraryView::new(&library);
        let mut explorer = titles(&genre_explorer(&view, &mut RandomShuffler::seeded(9)));
        explorer.sort();

        assert_eq!(explorer, vec!["Jazz", "Pop", "Rock"]);
    }

    #[test]
    fn test_genre_explorer_without_any_plays_is_empty() {
        let library = vec![
            Track { genres: "Rock".to_string(), ..song("A", "X") },
            Track { genres: "Pop".to_string(), ..song("B", "Y") },
        ];

        let view = LibraryView::new(&library);
        assert!(genre_explorer(&view, &mut KeepOrder).is_empty());
    }

    #[test]
    fn test_tempo_match_uses_playing_track_and_excludes_it() {
        let library = vec![
            Track { beats_per_minute: 120, ..song("Playing", "A") },
            Track { beats_per_minute: 120, ..song("Playing", "A") },
            Track { beats_per_minute: 130, ..song("Close", "B") },
            Track { beats_per_minute: 135, ..song("Edge", "C") },
            Track { beats_per_minute: 136, ..song("Too fast", "D") },
            Track { beats_per_minute: 0, ..song("Unknown", "E") },
        ];

        let view = LibraryView::new(&library);
        let matched = tempo_match(&view, Some(&library[0]));

        assert_eq!(matched.len(), 3);
        assert!(std::ptr::eq(matched[0], &library[1]), "an equal copy is not the playing track");
        assert_eq!(titles(&matched[1..]), vec!["Close", "Edge"]);
        assert!(matched.iter().all(|track| track.beats_per_minute.abs_diff(120) <= BPM_RANGE));
    }

    #[test]
    fn test_tempo_match_falls_back_to_recent_history() {
        let library = vec![
            Track { beats_per_minute: 0, ..played("Latest", "A", 1, 1) },
            Track { beats_per_minute: 90, ..played("Earlier", "A", 1, 2) },
            Track { beats_per_minute: 170, ..played("Much earlier", "A", 1, 3) },
            Track { beats_per_minute: 95, ..song("Match", "B") },
            Track { beats_per_minute: 160, ..song("No match", "B") },
        ];

        let view = LibraryView::new(&library);
        let playing_without_tempo = song("Untagged", "Z");
        let matched = tempo_match(&view, Some(&playing_without_tempo));

        assert_eq!(titles(&matched), vec!["Earlier", "Match"]);
    }

    #[test]
    fn test_tempo_match_absent_without_reference() {
        let library = vec![
            Track { beats_per_minute: 100, ..song("Tagged but unplayed", "A") },
            played("Played untagged", "B", 3, 1),
        ];

        let lanes = generate_all_recommendations(&library, None, NOW, &mut KeepOrder);
        assert!(!ids(&lanes).contains(&"tempo-match"));
    }

    #[test]
    fn test_artist_dna_crosses_over_and_dedupes() {
        let mut library = vec![
            Track { raw_genres: vec!["Shoegaze".into()], ..played("Soon", "Seed", 30, 1) },
            Track { raw_genres: vec!["Shoegaze".into()], ..played("Alison", "Cousin", 4, 1) },
            Track { raw_genres: vec!["shoegaze".into()], ..played("alison", "cousin", 2, 1) },
            Track { raw_genres: vec!["Shoegaze".into()], ..song("When the Sun Hits", "Other") },
            Track { raw_genres: vec!["Shoegaze".into()], ..song("Seed's other song", "SEED") },
            Track { raw_genres: vec!["Ambient".into()], ..song("Drift", "Outsider") },
        ];
        for i in 0..4 {
            library.push(Track {
                raw_genres: vec!["Techno".into()],
                ..played(&format!("Set {i}"), &format!("Dj {i}"), 10, 1)
            });
        }

        let view = LibraryView::new(&library);
        let dna = artist_dna(&view);

        // Seed and the four Djs fill the five seed slots; Cousin (6 plays) does not.
        assert_eq!(titles(&dna), vec!["Alison", "When the Sun Hits"]);
    }

    #[test]
    fn test_artist_list_and_display_string_agree() {
        let as_list = vec![
            Track { raw_artists: vec!["Duo".into()], ..played("Heard", "", 5, 1) },
            Track { raw_artists: vec!["Duo".into()], ..song("Unheard", "") },
        ];
        let as_string = vec![played("Heard", "Duo", 5, 1), song("Unheard", "Duo")];

        let from_list = generate_all_recommendations(&as_list, None, NOW, &mut KeepOrder);
        let from_string = generate_all_recommendations(&as_string, None, NOW, &mut KeepOrder);

        assert_eq!(ids(&from_list), ids(&from_string));
        for (a, b) in from_list.iter().zip(&from_string) {
            assert_eq!(titles(&a.tracks), titles(&b.tracks));
        }
    }

    #[test]
    fn test_lane_order_is_fixed() {
        let library = vec![
            Track { raw_genres: vec!["Rock".into()], beats_per_minute: 120, love: 1, ..played("Anthem", "Seed", 20, 60) },
            Track { raw_genres: vec!["Rock".into()], beats_per_minute: 118, ..song("Fresh", "Seed") },
            Track { raw_genres: vec!["Pop".into()], ..played("Catchy", "Pop Star", 3, 40) },
            Track { raw_genres: vec!["Rock".into()], beats_per_minute: 125, ..played("Cover", "Cover Band", 1, 2) },
        ];

        let lanes = generate_all_recommendations(&library, None, NOW, &mut KeepOrder);
        let order: Vec<usize> = lanes
            .iter()
            .map(|lane| LaneKind::ALL.iter().position(|kind| *kind == lane.kind).unwrap_or(usize::MAX))
            .collect();

        assert!(lanes.len() >= 8);
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(lanes.iter().all(|lane| !lane.tracks.is_empty() && lane.tracks.len() <= LANE_SIZE));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let library: Vec<Track> = (0..200u32)
            .map(|i| Track {
                love: i32::from(i % 7 == 0),
                rating: (i % 6) as u8,
                raw_genres: vec![format!("Genre {}", i % 12)],
                beats_per_minute: 80 + i % 90,
                ..played(&format!("Song {i}"), &format!("Artist {}", i % 17), i % 5, i64::from(i % 90))
            })
            .collect();

        let first = generate_all_recommendations(&library, None, NOW, &mut RandomShuffler::seeded(11));
        let second = generate_all_recommendations(&library, None, NOW, &mut RandomShuffler::seeded(11));

        assert_eq!(ids(&first), ids(&second));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(titles(&a.tracks), titles(&b.tracks));
        }
    }

    #[test]
    fn test_library_without_history_only_has_discovery_lanes() {
        let library: Vec<Track> = (0..100)
            .map(|i| Track {
                date_added: days_ago(i),
                beats_per_minute: 100,
                ..song(&format!("Song {i}"), &format!("Artist {}", i % 10))
            })
            .collect();

        let lanes = generate_all_recommendations(&library, None, NOW, &mut RandomShuffler::seeded(5));

        assert_eq!(ids(&lanes), vec!["fresh-finds", "hidden-gems"]);
    }

    #[test]
    fn test_every_lane_is_capped_when_oversupplied() {
        let mut library = Vec::new();
        for i in 0..40 {
            library.push(Track {
                raw_genres: vec!["Rock".into()],
                love: 1,
                beats_per_minute: 120,
                ..played(&format!("Played {i}"), &format!("Seed {}", i % 5), 10, 60)
            });
            library.push(Track {
                raw_genres: vec!["Rock".into()],
                ..song(&format!("Unplayed {i}"), &format!("Seed {}", i % 5))
            });
            library.push(Track {
                raw_genres: vec!["Rock".into(), "Jazz".into()],
                ..song(&format!("Other {i}"), &format!("Other {i}"))
            });
        }

        let lanes = generate_all_recommendations(&library, None, NOW, &mut RandomShuffler::seeded(4));

        assert_eq!(ids(&lanes), LaneKind::ALL.iter().map(|kind| kind.id()).collect::<Vec<_>>());
        for lane in &lanes {
            assert_eq!(lane.tracks.len(), LANE_SIZE, "lane {}", lane.id);
        }
    }
}
