pub mod clean;
pub mod tracks;

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::artists::generate_artists;
use crate::genres;
use crate::release::{Release, ReleaseType};

pub use tracks::{TrackCombineError, combine_tracks};

/// Source preference, highest priority first.
pub const PREFERENCES: &[&str] = &[
    "Tidal",
    "Deezer",
    "Bandcamp",
    "MusicBrainz",
    "iTunes",
    "Junodownload",
    "Discogs",
    "Beatport",
];

const COMMENT_SEPARATOR: &str = "\n\n--------------------------------\n\n";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("No base record and no source records to merge")]
    NoRecords,
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// Knobs for the merge engine. Built from the app config by the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Source names, highest priority first.
    pub preferences: Vec<String>,
    /// A track without replay gain takes each paired source's title,
    /// overriding the accent preference.
    pub replay_gain_sets_title: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            preferences: PREFERENCES.iter().map(|s| s.to_string()).collect(),
            replay_gain_sets_title: true,
        }
    }
}

static SOURCE_URL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("Tidal", r"^https?://(?:www\.|listen\.)?tidal\.com/"),
        ("Deezer", r"^https?://(?:www\.)?deezer\.com/"),
        ("Bandcamp", r"^https?://[^/]+\.bandcamp\.com/"),
        ("MusicBrainz", r"^https?://(?:www\.)?musicbrainz\.org/"),
        ("iTunes", r"^https?://(?:itunes|music)\.apple\.com/"),
        ("Junodownload", r"^https?://(?:www\.)?junodownload\.com/"),
        ("Discogs", r"^https?://(?:www\.)?discogs\.com/"),
        ("Beatport", r"^https?://(?:www\.)?beatport\.com/"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(&format!("(?i){pattern}")).unwrap()))
    .collect()
});

/// The source a release page URL belongs to, by host.
pub fn source_from_url(url: &str) -> Option<&'static str> {
    SOURCE_URL_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(url))
        .map(|(name, _)| *name)
}

/// Group records by source name in preference order.
///
/// Records keep their relative order within a group. Sources missing from
/// `preferences` come last, in the order they first appear.
pub fn sort_metadatas(
    records: Vec<(String, Release)>,
    preferences: &[String],
) -> Vec<(String, Vec<Release>)> {
    let mut groups: Vec<(String, Vec<Release>)> = Vec::new();
    for (source, record) in records {
        match groups
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(&source))
        {
            Some((_, group)) => group.push(record),
            None => groups.push((source, vec![record])),
        }
    }

    let rank = |name: &str| {
        preferences
            .iter()
            .position(|p| p.eq_ignore_ascii_case(name))
            .unwrap_or_else(|| {
                log::debug!("Source {name} has no preference, merging it last");
                preferences.len()
            })
    };
    // Stable: unlisted sources keep their order of appearance.
    groups.sort_by_cached_key(|(name, _)| rank(name.as_str()));
    groups
}

/// Names of sources that already have a URL in `urls` (or the transient `url`).
fn url_sources(release: &Release) -> Vec<String> {
    release
        .url
        .iter()
        .chain(release.urls.iter())
        .filter_map(|url| source_from_url(url))
        .map(str::to_string)
        .collect()
}

/// Fold every record into one, source group by source group in
/// preference order.
///
/// With no `base`, the first record of the highest-ranked group becomes
/// the accumulator. Each later record fills what the accumulator lacks;
/// see [`fold_record`]. Finally the release artists are regenerated from
/// the merged tracks and genres are deduplicated.
pub fn combine_metadatas(
    records: Vec<(String, Release)>,
    base: Option<Release>,
    opts: &MergeOptions,
) -> Result<Release> {
    let mut contributed: Vec<String> = base.as_ref().map(url_sources).unwrap_or_default();
    let mut acc = base;

    for (source, group) in sort_metadatas(records, &opts.preferences) {
        let group_url = group.first().and_then(|r| r.url.clone());

        for record in group {
            match acc.as_mut() {
                None => {
                    log::info!("Using {source} as the base record");
                    let mut record = record;
                    if let Some(url) = record.url.clone() {
                        if !record.urls.contains(&url) {
                            record.urls.push(url);
                        }
                    }
                    contributed.extend(url_sources(&record));
                    acc = Some(record);
                }
                Some(base) => {
                    log::info!("Folding {source} into the base record");
                    fold_record(base, record, opts);
                }
            }
        }

        let Some(base) = acc.as_mut() else {
            continue;
        };
        if let Some(url) = group_url {
            let link_source = source_from_url(&url).unwrap_or(source.as_str()).to_string();
            let known = contributed
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&link_source));
            if !known {
                if !base.urls.contains(&url) {
                    base.urls.push(url);
                }
                contributed.push(link_source);
            }
        }
    }

    let mut release = acc.ok_or(MergeError::NoRecords)?;
    release.url = None;
    let (artists, tracks) = generate_artists(std::mem::take(&mut release.tracks));
    release.artists = artists;
    release.tracks = tracks;
    release.genres = genres::dedupe(std::mem::take(&mut release.genres));
    Ok(release)
}

/// Merge one lower-priority record into `base`, field by field.
fn fold_record(base: &mut Release, record: Release, opts: &MergeOptions) {
    base.genres.extend(record.genres);

    match combine_tracks(&base.tracks, &record.tracks, opts) {
        Ok(tracks) => base.tracks = tracks,
        Err(err) => log::warn!("Ignoring tracks of {:?}: {err}", record.title),
    }

    fold_label(base, record.label, record.catno);

    if let Some(comment) = record.comment {
        base.comment = Some(match base.comment.take() {
            Some(existing) => format!("{existing}{COMMENT_SEPARATOR}{comment}"),
            None => comment,
        });
    }

    if base.cover.is_none() {
        base.cover = record.cover;
    }
    if base.edition_title.is_none() {
        base.edition_title = record.edition_title;
    }
    if base.year.is_none() {
        base.year = record.year;
    }
    base.group_year = match (base.group_year, record.group_year) {
        (Some(ours), Some(theirs)) => Some(ours.min(theirs)),
        (ours, theirs) => ours.or(theirs),
    };
    // Date, year and group year travel together from one source.
    if base.date.is_none() && record.date.is_some() {
        base.date = record.date;
        base.year = record.year.or(base.year);
        base.group_year = record.group_year.or(base.group_year);
    }
    if record.rls_type.is_some() && matches!(base.rls_type, None | Some(ReleaseType::Album)) {
        base.rls_type = record.rls_type;
    }
    if base.upc.is_none() {
        base.upc = record.upc;
    }
    for (key, value) in record.extra {
        base.extra.entry(key).or_insert(value);
    }
}

/// Take label and catalogue number together from a source that has both,
/// unless the base already names a label the source does not mention.
fn fold_label(base: &mut Release, label: Option<String>, catno: Option<String>) {
    let compatible = match (&base.label, &label) {
        (None, _) => true,
        (Some(ours), Some(theirs)) => shares_word(ours, theirs),
        (Some(_), None) => false,
    };

    if (base.label.is_none() || base.catno.is_none()) && compatible {
        if let (Some(label), Some(catno)) = (&label, &catno) {
            base.label = Some(label.clone());
            base.catno = Some(catno.clone());
            return;
        }
    }

    if base.label.is_none() && label.is_some() {
        base.label = label;
        if base.catno.is_none() {
            base.catno = catno;
        }
    } else if base.catno.is_none() && compatible {
        base.catno = catno;
    }
}

/// Whether any word of `ours` appears in `theirs`, ignoring case.
fn shares_word(ours: &str, theirs: &str) -> bool {
    let theirs = theirs.to_lowercase();
    ours.split_whitespace()
        .any(|word| theirs.contains(&word.to_lowercase()))
}

/// Full reconciliation: merge, clean up redundant credits, regenerate
/// artists and totals, dedupe genres.
pub fn reconcile(
    records: Vec<(String, Release)>,
    base: Option<Release>,
    opts: &MergeOptions,
) -> Result<Release> {
    let mut release = combine_metadatas(records, base, opts)?;
    clean::clean_release(&mut release);
    let (artists, mut tracks) = generate_artists(std::mem::take(&mut release.tracks));
    tracks.assign_totals();
    release.artists = artists;
    release.tracks = tracks;
    release.genres = genres::dedupe(std::mem::take(&mut release.genres));
    Ok(release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{Artist, Role, Track, Tracks};

    fn make_tracks(count: usize) -> Tracks {
        (1..=count)
            .map(|n| {
                Track::new(
                    "1",
                    n.to_string(),
                    format!("Track {n}"),
                    vec![Artist::main("Burial")],
                )
            })
            .collect()
    }

    fn make_release(title: &str, tracks: usize) -> Release {
        Release {
            title: title.to_string(),
            artists: vec![Artist::main("Burial")],
            tracks: make_tracks(tracks),
            ..Default::default()
        }
    }

    fn merge(records: Vec<(&str, Release)>, base: Option<Release>) -> Release {
        let records = records
            .into_iter()
            .map(|(s, r)| (s.to_string(), r))
            .collect();
        combine_metadatas(records, base, &MergeOptions::default()).unwrap()
    }

    #[test]
    fn test_source_from_url() {
        assert_eq!(source_from_url("https://tidal.com/browse/album/123"), Some("Tidal"));
        assert_eq!(source_from_url("https://listen.tidal.com/album/123"), Some("Tidal"));
        assert_eq!(source_from_url("https://www.deezer.com/en/album/1"), Some("Deezer"));
        assert_eq!(
            source_from_url("https://burial.bandcamp.com/album/untrue"),
            Some("Bandcamp")
        );
        assert_eq!(
            source_from_url("https://music.apple.com/us/album/untrue/1"),
            Some("iTunes")
        );
        assert_eq!(source_from_url("https://www.discogs.com/release/1"), Some("Discogs"));
        assert_eq!(source_from_url("https://example.com/"), None);
    }

    #[test]
    fn test_sort_metadatas_preference_order() {
        let records = vec![
            ("Discogs".to_string(), make_release("d", 1)),
            ("Qobuz".to_string(), make_release("q", 1)),
            ("Tidal".to_string(), make_release("t1", 1)),
            ("tidal".to_string(), make_release("t2", 1)),
        ];
        let groups = sort_metadatas(records, &MergeOptions::default().preferences);
        let order: Vec<(&str, Vec<&str>)> = groups
            .iter()
            .map(|(s, g)| (s.as_str(), g.iter().map(|r| r.title.as_str()).collect()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Tidal", vec!["t1", "t2"]),
                ("Discogs", vec!["d"]),
                ("Qobuz", vec!["q"]),
            ]
        );
    }

    #[test]
    fn test_no_records() {
        let err = combine_metadatas(Vec::new(), None, &MergeOptions::default()).unwrap_err();
        assert_eq!(err, MergeError::NoRecords);
    }

    #[test]
    fn test_track_mismatch_keeps_tracks_but_takes_fields() {
        let base = make_release("Untrue", 10);
        let mut longer = make_release("Untrue", 12);
        longer.label = Some("Hyperdub".into());
        longer.catno = Some("HDBCD002".into());
        for track in longer.tracks.iter_mut() {
            track.isrc = Some("X".into());
        }

        let merged = merge(vec![("Deezer", longer)], Some(base.clone()));
        assert_eq!(merged.tracks.len(), 10);
        assert!(merged.tracks.iter().all(|t| t.isrc.is_none()));
        assert_eq!(merged.label.as_deref(), Some("Hyperdub"));
        assert_eq!(merged.catno.as_deref(), Some("HDBCD002"));
    }

    #[test]
    fn test_genres_deduplicated() {
        let mut a = make_release("A", 1);
        a.genres = vec!["House".into()];
        let mut b = make_release("A", 1);
        b.genres = vec!["House".into(), "house".into(), "Techno".into()];

        let merged = merge(vec![("Tidal", a), ("Deezer", b)], None);
        assert_eq!(merged.genres, vec!["House".to_string(), "Techno".to_string()]);
    }

    #[test]
    fn test_label_guard_shared_word() {
        let mut base = make_release("Selected Ambient Works", 1);
        base.label = Some("Warp".into());
        let mut theirs = make_release("Selected Ambient Works", 1);
        theirs.label = Some("Warp Records".into());
        theirs.catno = Some("WARP123".into());

        let merged = merge(vec![("Discogs", theirs)], Some(base));
        assert_eq!(merged.label.as_deref(), Some("Warp Records"));
        assert_eq!(merged.catno.as_deref(), Some("WARP123"));
    }

    #[test]
    fn test_label_guard_unrelated_label() {
        let mut base = make_release("Selected Ambient Works", 1);
        base.label = Some("Warp".into());
        let mut theirs = make_release("Selected Ambient Works", 1);
        theirs.label = Some("Ninja Tune".into());
        theirs.catno = Some("ZEN99".into());

        let merged = merge(vec![("Discogs", theirs)], Some(base));
        assert_eq!(merged.label.as_deref(), Some("Warp"));
        assert_eq!(merged.catno, None);
    }

    #[test]
    fn test_comment_appended_in_preference_order() {
        let mut low = make_release("A", 1);
        low.comment = Some("from deezer".into());
        let mut high = make_release("A", 1);
        high.comment = Some("from tidal".into());

        let merged = merge(vec![("Deezer", low), ("Tidal", high)], None);
        assert_eq!(
            merged.comment.as_deref(),
            Some("from tidal\n\n--------------------------------\n\nfrom deezer")
        );
    }

    #[test]
    fn test_group_year_takes_earliest() {
        let mut a = make_release("A", 1);
        a.group_year = Some(2011);
        let mut b = make_release("A", 1);
        b.group_year = Some(2007);
        let merged = merge(vec![("Tidal", a), ("Deezer", b)], None);
        assert_eq!(merged.group_year, Some(2007));
    }

    #[test]
    fn test_date_fields_come_from_one_source() {
        let mut base = make_release("A", 1);
        base.year = Some(2020);
        base.group_year = Some(2020);
        let mut dated = make_release("A", 1);
        dated.date = Some("2007-11-05".into());
        dated.year = Some(2007);
        dated.group_year = Some(2007);

        let merged = merge(vec![("Deezer", dated)], Some(base));
        assert_eq!(merged.date.as_deref(), Some("2007-11-05"));
        assert_eq!(merged.year, Some(2007));
        assert_eq!(merged.group_year, Some(2007));
    }

    #[test]
    fn test_specific_release_type_beats_album() {
        let mut base = make_release("A", 1);
        base.rls_type = Some(ReleaseType::Album);
        let mut ep = make_release("A", 1);
        ep.rls_type = Some(ReleaseType::Ep);
        let mut single = make_release("A", 1);
        single.rls_type = Some(ReleaseType::Single);

        let merged = merge(vec![("Tidal", ep), ("Deezer", single)], Some(base));
        assert_eq!(merged.rls_type, Some(ReleaseType::Ep));
    }

    #[test]
    fn test_urls_one_per_source() {
        let mut base = make_release("A", 1);
        base.url = Some("https://tidal.com/browse/album/1".into());
        base.urls = vec!["https://tidal.com/browse/album/1".into()];
        let mut tidal = make_release("A", 1);
        tidal.url = Some("https://listen.tidal.com/album/1".into());
        let mut deezer = make_release("A", 1);
        deezer.url = Some("https://www.deezer.com/album/9".into());
        let mut deezer_again = make_release("A", 1);
        deezer_again.url = Some("https://www.deezer.com/album/10".into());

        let merged = merge(
            vec![("Tidal", tidal), ("Deezer", deezer), ("Deezer", deezer_again)],
            Some(base),
        );
        assert_eq!(
            merged.urls,
            vec![
                "https://tidal.com/browse/album/1".to_string(),
                "https://www.deezer.com/album/9".to_string(),
            ]
        );
        assert_eq!(merged.url, None);
    }

    #[test]
    fn test_artists_regenerated_from_tracks() {
        let mut base = make_release("A", 1);
        base.artists = Vec::new();
        let mut theirs = make_release("A", 1);
        for track in theirs.tracks.iter_mut() {
            track.artists.push(Artist::new("Kode9", Role::Remixer));
        }
        let merged = merge(vec![("Deezer", theirs)], Some(base));
        assert_eq!(
            merged.artists,
            vec![Artist::main("Burial"), Artist::new("Kode9", Role::Remixer)]
        );
    }

    #[test]
    fn test_merge_is_deterministic() {
        let build = || {
            let mut a = make_release("A", 2);
            a.genres = vec!["Dubstep".into(), "UK Garage".into()];
            let mut b = make_release("A", 2);
            b.genres = vec!["Electronic".into(), "dubstep".into()];
            b.label = Some("Hyperdub".into());
            vec![("Deezer", a), ("Discogs", b)]
        };
        assert_eq!(merge(build(), None), merge(build(), None));
    }

    #[test]
    fn test_reconcile_assigns_totals() {
        let records = vec![("Tidal".to_string(), make_release("A", 3))];
        let merged = reconcile(records, None, &MergeOptions::default()).unwrap();
        assert!(
            merged
                .tracks
                .iter()
                .all(|t| t.tracktotal == Some(3) && t.disctotal == Some(1))
        );
    }
}
