pub mod tracks;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use tracks::{Disc, Tracks};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unknown artist role: {0}")]
    Role(String),
    #[error("Unknown release type: {0}")]
    ReleaseType(String),
}

/// An artist's credited function on a release or track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Main,
    Guest,
    Remixer,
    Composer,
    Conductor,
    #[serde(rename = "djcompiler")]
    DjCompiler,
    Producer,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Main,
        Role::Guest,
        Role::Remixer,
        Role::Composer,
        Role::Conductor,
        Role::DjCompiler,
        Role::Producer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Guest => "guest",
            Self::Remixer => "remixer",
            Self::Composer => "composer",
            Self::Conductor => "conductor",
            Self::DjCompiler => "djcompiler",
            Self::Producer => "producer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| ParseError::Role(s.to_string()))
    }
}

/// Release types understood by Gazelle trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseType {
    Album,
    #[serde(rename = "EP")]
    Ep,
    Single,
    Compilation,
    Soundtrack,
    Mixtape,
    #[serde(rename = "Live album")]
    LiveAlbum,
    Remix,
    #[serde(rename = "DJ Mix")]
    DjMix,
    Interview,
}

impl ReleaseType {
    pub const ALL: [ReleaseType; 10] = [
        ReleaseType::Album,
        ReleaseType::Ep,
        ReleaseType::Single,
        ReleaseType::Compilation,
        ReleaseType::Soundtrack,
        ReleaseType::Mixtape,
        ReleaseType::LiveAlbum,
        ReleaseType::Remix,
        ReleaseType::DjMix,
        ReleaseType::Interview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Ep => "EP",
            Self::Single => "Single",
            Self::Compilation => "Compilation",
            Self::Soundtrack => "Soundtrack",
            Self::Mixtape => "Mixtape",
            Self::LiveAlbum => "Live album",
            Self::Remix => "Remix",
            Self::DjMix => "DJ Mix",
            Self::Interview => "Interview",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = ParseError;

    /// Case-insensitive, so hand-edited records may write "ep" or "live album".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ReleaseType::ALL
            .into_iter()
            .find(|t| t.as_str().to_lowercase() == lower)
            .ok_or_else(|| ParseError::ReleaseType(s.to_string()))
    }
}

/// A single artist credit. Serialized as a `[name, role]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, Role)", into = "(String, Role)")]
pub struct Artist {
    pub name: String,
    pub role: Role,
}

impl Artist {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn main(name: impl Into<String>) -> Self {
        Self::new(name, Role::Main)
    }
}

impl From<(String, Role)> for Artist {
    fn from((name, role): (String, Role)) -> Self {
        Self { name, role }
    }
}

impl From<Artist> for (String, Role) {
    fn from(artist: Artist) -> Self {
        (artist.name, artist.role)
    }
}

/// One recording's per-release metadata.
///
/// `number` and `disc` echo the keys the track is stored under in
/// [`Tracks`]; the map keys win when a record is deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "track#", default)]
    pub number: String,
    #[serde(rename = "disc#", default)]
    pub disc: String,
    #[serde(default)]
    pub tracktotal: Option<u32>,
    #[serde(default)]
    pub disctotal: Option<u32>,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub replay_gain: Option<String>,
    #[serde(default)]
    pub peak: Option<String>,
    #[serde(default)]
    pub explicit: Option<bool>,
    #[serde(default)]
    pub isrc: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    /// Source-specific fields (stream ids, streamable flags...) carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    pub fn new(
        disc: impl Into<String>,
        number: impl Into<String>,
        title: impl Into<String>,
        artists: Vec<Artist>,
    ) -> Self {
        Self {
            number: number.into(),
            disc: disc.into(),
            artists,
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.artists.iter().any(|a| a.role == role)
    }
}

/// The canonical unit of exchange between scrapers, the merge engine and
/// downstream tagging/upload steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Release {
    pub artists: Vec<Artist>,
    pub title: String,
    pub year: Option<i32>,
    pub group_year: Option<i32>,
    pub date: Option<String>,
    pub edition_title: Option<String>,
    pub label: Option<String>,
    pub catno: Option<String>,
    pub upc: Option<String>,
    pub comment: Option<String>,
    pub rls_type: Option<ReleaseType>,
    pub genres: Vec<String>,
    pub cover: Option<String>,
    /// Physical/digital media of the uploader's copy (Gazelle "source": CD, WEB...).
    #[serde(rename = "source")]
    pub media: Option<String>,
    pub urls: Vec<String>,
    /// Transient URL of the page a scraper read; folded into `urls` and dropped on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub tracks: Tracks,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Release {
    /// Distinct names credited with `role` on the release, in credit order.
    pub fn artist_names(&self, role: Role) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for artist in self.artists.iter().filter(|a| a.role == role) {
            if !names.contains(&artist.name.as_str()) {
                names.push(&artist.name);
            }
        }
        names
    }
}
