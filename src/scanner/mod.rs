pub mod metadata;
pub mod tags;

use std::path::{Path, PathBuf};

use lofty::tag::Tag;
use thiserror::Error;
use walkdir::WalkDir;

use crate::artists::credits::split_names;
use crate::artists::generate_artists;
use crate::genres;
use crate::release::{Release, Tracks};
use tags::{AudioFormat, FieldAccess, TagField};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(String),
    #[error("No audio files in {0}")]
    NoAudioFiles(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Audio files under `dir`, sorted by path.
pub fn collect_audio_files(dir: &Path) -> Result<Vec<(PathBuf, AudioFormat)>> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(format) = AudioFormat::from_path(entry.path()) {
            files.push((entry.into_path(), format));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Build the base record of a release from the tags of its files.
///
/// `media` is the Gazelle source of the uploader's copy (CD, WEB...),
/// which no tag records.
pub fn build_base_release(dir: &Path, media: Option<&str>) -> Result<Release> {
    let files = collect_audio_files(dir)?;
    if files.is_empty() {
        return Err(ScanError::NoAudioFiles(dir.display().to_string()));
    }
    log::info!("Reading tags of {} files in {}", files.len(), dir.display());

    let tagged: Vec<(Tag, AudioFormat)> = files
        .iter()
        .map(|(path, format)| (metadata::read_tags(path, *format), *format))
        .collect();
    Ok(release_from_tags(&tagged, media))
}

/// Assemble a release from per-file tags, in file order. Release-level
/// fields come from the first file.
pub fn release_from_tags(files: &[(Tag, AudioFormat)], media: Option<&str>) -> Release {
    let mut tracks: Tracks = files
        .iter()
        .enumerate()
        .map(|(i, (tag, format))| metadata::track_from_tag(tag, *format, i + 1))
        .collect();
    tracks.assign_totals();
    let (artists, tracks) = generate_artists(tracks);

    let mut release = Release {
        artists,
        tracks,
        media: media.map(str::to_string),
        ..Default::default()
    };

    if let Some((first, _)) = files.first() {
        release.title = first.read_field(TagField::Album).unwrap_or_default();
        release.year = first
            .read_field(TagField::Date)
            .and_then(|d| metadata::parse_year(&d));
        release.group_year = release.year;
        release.label = first.read_field(TagField::Label);
        release.catno = first.read_field(TagField::CatalogNumber);
        release.upc = first.read_field(TagField::Upc);
        let raw_genres: Vec<String> = first
            .read_fields(TagField::Genre)
            .iter()
            .flat_map(|g| split_names(g))
            .collect();
        release.genres = genres::dedupe(raw_genres);
    }
    release
}
