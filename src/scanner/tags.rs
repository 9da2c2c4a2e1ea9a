//! Uniform field access over the tag formats of the supported containers.

use std::path::Path;

use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

/// Audio containers a release directory may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Flac,
    Mp3,
    Aac,
    Ogg,
    Opus,
    Wav,
    Aiff,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 7] = [
        Self::Flac,
        Self::Mp3,
        Self::Aac,
        Self::Ogg,
        Self::Opus,
        Self::Wav,
        Self::Aiff,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "flac" => Some(Self::Flac),
            "mp3" => Some(Self::Mp3),
            "m4a" | "aac" | "mp4" => Some(Self::Aac),
            "ogg" | "oga" => Some(Self::Ogg),
            "opus" => Some(Self::Opus),
            "wav" => Some(Self::Wav),
            "aif" | "aiff" => Some(Self::Aiff),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// The tag format this container carries natively.
    pub fn tag_type(&self) -> TagType {
        match self {
            Self::Flac | Self::Ogg | Self::Opus => TagType::VorbisComments,
            Self::Mp3 | Self::Wav | Self::Aiff => TagType::Id3v2,
            Self::Aac => TagType::Mp4Ilst,
        }
    }

    /// Name as it appears in a track's `format` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flac => "FLAC",
            Self::Mp3 => "MP3",
            Self::Aac => "AAC",
            Self::Ogg => "Vorbis",
            Self::Opus => "Opus",
            Self::Wav => "WAV",
            Self::Aiff => "AIFF",
        }
    }
}

/// Release/track fields read from and written to file tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Title,
    Artist,
    Album,
    Genre,
    Label,
    CatalogNumber,
    Upc,
    Isrc,
    ReplayGain,
    Peak,
    Date,
    TrackNumber,
    TrackTotal,
    DiscNumber,
    DiscTotal,
}

impl TagField {
    fn item_key(&self) -> ItemKey {
        match self {
            Self::Title => ItemKey::TrackTitle,
            Self::Artist => ItemKey::TrackArtist,
            Self::Album => ItemKey::AlbumTitle,
            Self::Genre => ItemKey::Genre,
            Self::Label => ItemKey::Label,
            Self::CatalogNumber => ItemKey::CatalogNumber,
            Self::Upc => ItemKey::Barcode,
            Self::Isrc => ItemKey::Isrc,
            Self::ReplayGain => ItemKey::ReplayGainTrackGain,
            Self::Peak => ItemKey::ReplayGainTrackPeak,
            Self::Date => ItemKey::RecordingDate,
            Self::TrackNumber => ItemKey::TrackNumber,
            Self::TrackTotal => ItemKey::TrackTotal,
            Self::DiscNumber => ItemKey::DiscNumber,
            Self::DiscTotal => ItemKey::DiscTotal,
        }
    }
}

/// Read and write [`TagField`]s without caring which tag format is underneath.
///
/// The scanner only reads; the writers are public for library callers
/// that update tags in place.
pub trait FieldAccess {
    /// First non-empty value of `field`, trimmed.
    fn read_field(&self, field: TagField) -> Option<String>;
    /// Every non-empty value of `field`, trimmed.
    fn read_fields(&self, field: TagField) -> Vec<String>;
    /// Replace `field` with a single value. False if the format cannot store it.
    fn write_field(&mut self, field: TagField, value: &str) -> bool;
    /// Replace `field` with several values.
    fn write_fields(&mut self, field: TagField, values: &[String]) -> bool;
}

impl FieldAccess for Tag {
    fn read_field(&self, field: TagField) -> Option<String> {
        self.read_fields(field).into_iter().next()
    }

    fn read_fields(&self, field: TagField) -> Vec<String> {
        self.get_strings(&field.item_key())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn write_field(&mut self, field: TagField, value: &str) -> bool {
        self.insert_text(field.item_key(), value.to_string())
    }

    fn write_fields(&mut self, field: TagField, values: &[String]) -> bool {
        let key = field.item_key();
        self.remove_key(&key);
        let mut stored = true;
        for value in values {
            stored &= self.push(TagItem::new(key.clone(), ItemValue::Text(value.clone())));
        }
        stored
    }
}
