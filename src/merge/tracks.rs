use thiserror::Error;

use super::MergeOptions;
use crate::artists::fragments::check_for_artist_fragments;
use crate::normalize::{credit_key, title_key};
use crate::release::{Track, Tracks};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackCombineError {
    #[error(
        "Track count mismatch: source has {incoming} tracks, base has {base} (first unmatched: disc {disc}, track {track})"
    )]
    IncomingLonger {
        base: usize,
        incoming: usize,
        disc: String,
        track: String,
    },
}

pub type Result<T> = std::result::Result<T, TrackCombineError>;

/// Merge `incoming` into a copy of `base`, pairing tracks by position.
///
/// The Nth track of `base` is paired with the Nth track of `incoming`
/// whatever their disc/track labels say. A source listing more tracks
/// than `base` is rejected before anything is merged; a shorter one only
/// contributes to the tracks it reaches.
pub fn combine_tracks(base: &Tracks, incoming: &Tracks, opts: &MergeOptions) -> Result<Tracks> {
    if let Some(extra) = incoming.iter().nth(base.len()) {
        return Err(TrackCombineError::IncomingLonger {
            base: base.len(),
            incoming: incoming.len(),
            disc: extra.disc.clone(),
            track: extra.number.clone(),
        });
    }

    let mut merged = base.clone();
    for (ours, theirs) in merged.iter_mut().zip(incoming.iter()) {
        merge_track(ours, theirs, opts);
    }
    Ok(merged)
}

fn merge_track(base: &mut Track, incoming: &Track, opts: &MergeOptions) {
    if let (Some(ours), Some(theirs)) = (&base.title, &incoming.title) {
        if title_key(Some(ours)) != title_key(Some(theirs)) {
            log::debug!(
                "Disc {} track {}: {:?} and {:?} differ, not pairing",
                base.disc,
                base.number,
                ours,
                theirs
            );
            return;
        }
        if decoration(theirs) > decoration(ours) {
            base.title = incoming.title.clone();
        }
    } else if base.title.is_none() {
        base.title = incoming.title.clone();
    }

    for artist in &incoming.artists {
        let key = credit_key(&artist.name);
        let known = base
            .artists
            .iter()
            .any(|a| a.role == artist.role && credit_key(&a.name) == key);
        if !known {
            base.artists.push(artist.clone());
        }
    }
    base.artists = check_for_artist_fragments(std::mem::take(&mut base.artists));

    if incoming.explicit == Some(true) {
        base.explicit = Some(true);
    }

    if base.format.is_none() {
        base.format = incoming.format.clone();
    }
    if base.isrc.is_none() {
        base.isrc = incoming.isrc.clone();
    }
    if base.replay_gain.is_none() {
        // A base without replay gain takes the source's title spelling,
        // whether or not the source has replay gain to give.
        if opts.replay_gain_sets_title && incoming.title.is_some() {
            base.title = incoming.title.clone();
        }
        if incoming.replay_gain.is_some() {
            base.replay_gain = incoming.replay_gain.clone();
            if base.peak.is_none() {
                base.peak = incoming.peak.clone();
            }
        }
    }

    if let (Some(tracktotal), Some(disctotal)) = (incoming.tracktotal, incoming.disctotal) {
        base.tracktotal = Some(tracktotal);
        base.disctotal = Some(disctotal);
    }

    for (key, value) in &incoming.extra {
        base.extra
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }
}

/// Characters a plain-ASCII spelling of the title would lose.
fn decoration(title: &str) -> usize {
    title.chars().filter(|c| !c.is_ascii()).count()
}
