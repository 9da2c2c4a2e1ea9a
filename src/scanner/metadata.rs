use std::path::Path;
use std::sync::LazyLock;

use lofty::file::TaggedFileExt;
use lofty::tag::Tag;
use regex::Regex;

use super::tags::{AudioFormat, FieldAccess, TagField};
use crate::artists::credits::parse_artists;
use crate::release::Track;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());

/// Read the tag of an audio file. Returns an empty tag of the container's
/// native type when the file has none or cannot be parsed.
pub fn read_tags(path: &Path, format: AudioFormat) -> Tag {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Could not read tags from {}: {}", path.display(), e);
            return Tag::new(format.tag_type());
        }
    };

    // Try primary tag, then fall back
    match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        Some(tag) => tag.clone(),
        None => {
            log::debug!("{} has no tags", path.display());
            Tag::new(format.tag_type())
        }
    }
}

/// First four-digit run of a date tag ("2007-11-05", "11/05/2007").
pub fn parse_year(date: &str) -> Option<i32> {
    YEAR_RE.find(date).and_then(|m| m.as_str().parse().ok())
}

/// Split "3/12" into the position and the optional total. Numeric
/// positions lose leading zeros ("03" → "3"); vinyl sides ("A1") are kept.
pub fn parse_position(value: &str) -> (String, Option<u32>) {
    let (position, total) = match value.split_once('/') {
        Some((p, t)) => (p.trim(), t.trim().parse().ok()),
        None => (value.trim(), None),
    };
    let position = match position.parse::<u32>() {
        Ok(n) => n.to_string(),
        Err(_) => position.to_string(),
    };
    (position, total)
}

/// Build a track from one file's tag. `index` (1-based) numbers files
/// that carry no track number.
pub fn track_from_tag(tag: &Tag, format: AudioFormat, index: usize) -> Track {
    let (disc, disc_total) = tag
        .read_field(TagField::DiscNumber)
        .map(|v| parse_position(&v))
        .filter(|(d, _)| !d.is_empty())
        .unwrap_or_else(|| ("1".to_string(), None));
    let (number, track_total) = tag
        .read_field(TagField::TrackNumber)
        .map(|v| parse_position(&v))
        .filter(|(n, _)| !n.is_empty())
        .unwrap_or_else(|| (index.to_string(), None));

    Track {
        number,
        disc,
        tracktotal: tag
            .read_field(TagField::TrackTotal)
            .and_then(|v| v.parse().ok())
            .or(track_total),
        disctotal: tag
            .read_field(TagField::DiscTotal)
            .and_then(|v| v.parse().ok())
            .or(disc_total),
        artists: parse_artists(tag.read_fields(TagField::Artist).as_slice()),
        title: tag.read_field(TagField::Title),
        replay_gain: tag.read_field(TagField::ReplayGain),
        peak: tag.read_field(TagField::Peak),
        isrc: tag.read_field(TagField::Isrc),
        format: Some(format.as_str().to_string()),
        ..Default::default()
    }
}
