//! Per-source preparation, run on each scraped record before merging.

use crate::artists::generate_artists;
use crate::genres;
use crate::infer::infer_release_type;
use crate::merge::clean::clear_catno_if_upc;
use crate::release::{Release, Role, Tracks};

const SELF_RELEASED: &str = "Self-Released";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareOptions {
    /// Remixer count at which a title gets a generic "(Remixed)".
    pub various_artist_threshold: usize,
    /// Genres never kept from a source, compared case-insensitively.
    pub blacklisted_genres: Vec<String>,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            various_artist_threshold: 4,
            blacklisted_genres: Vec::new(),
        }
    }
}

/// Normalize one scraped record so it can be merged with others.
pub fn prepare_scraped(mut release: Release, opts: &PrepareOptions) -> Release {
    let kept = genres::remove_blacklisted(
        std::mem::take(&mut release.genres),
        &opts.blacklisted_genres,
    );
    release.genres = genres::standardize(&kept);

    if release.urls.is_empty() {
        if let Some(url) = &release.url {
            release.urls.push(url.clone());
        }
    }

    let (artists, mut tracks) = generate_artists(std::mem::take(&mut release.tracks));
    append_remixers_to_track_titles(&mut tracks, opts.various_artist_threshold);
    tracks.assign_totals();
    release.artists = artists;
    release.tracks = tracks;

    infer_release_type(&mut release);
    release.label = process_label(&release);
    clear_catno_if_upc(&mut release);
    release
}

/// Name the remixers in titles that do not already say "Remix".
pub fn append_remixers_to_track_titles(tracks: &mut Tracks, various_artist_threshold: usize) {
    for track in tracks.iter_mut() {
        let remixers: Vec<&str> = track
            .artists
            .iter()
            .filter(|a| a.role == Role::Remixer)
            .map(|a| a.name.as_str())
            .collect();
        if remixers.is_empty() {
            continue;
        }
        let Some(title) = track.title.as_mut() else {
            continue;
        };
        if title.contains("Remix") {
            continue;
        }
        if remixers.len() >= various_artist_threshold {
            title.push_str(" (Remixed)");
        } else {
            title.push_str(&format!(" ({} Remix)", remixers.join(" & ")));
        }
    }
}

/// A label named after one of the main artists means the release is
/// self-released.
pub fn process_label(release: &Release) -> Option<String> {
    let label = release.label.as_ref()?;
    let lowered = label.to_lowercase();
    let bare = lowered.strip_suffix(" music").unwrap_or(&lowered);
    let own_label = release
        .artists
        .iter()
        .filter(|a| a.role == Role::Main)
        .map(|a| a.name.to_lowercase())
        .any(|name| name == lowered || name == bare);
    if own_label {
        Some(SELF_RELEASED.to_string())
    } else {
        Some(label.clone())
    }
}
