use thiserror::Error;

use crate::release::{Release, Role};

/// Media accepted by the tracker.
pub const MEDIA: &[&str] = &[
    "CD",
    "DVD",
    "Vinyl",
    "Soundboard",
    "SACD",
    "DAT",
    "Cassette",
    "WEB",
    "Blu-Ray",
];

/// First year a CD could have been pressed.
const FIRST_CD_YEAR: i32 = 1982;

const FIELD_LENGTH: std::ops::RangeInclusive<usize> = 2..=80;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidMetadata {
    #[error("Release title is empty")]
    EmptyTitle,
    #[error("You must have at least one main artist")]
    NoMainArtist,
    #[error("Disc {disc} track {track} has no main artist")]
    TrackWithoutMainArtist { disc: String, track: String },
    #[error("Year is missing")]
    MissingYear,
    #[error("Release type is missing")]
    MissingReleaseType,
    #[error("You must specify at least one genre")]
    NoGenres,
    #[error("{0} is not a valid source")]
    InvalidMedia(String),
    #[error("You cannot have a CD upload from before 1982 (year {0})")]
    CdTooOld(i32),
    #[error("Label must be between 2 and 80 characters: {0:?}")]
    LabelLength(String),
    #[error("Catalogue number must be between 2 and 80 characters: {0:?}")]
    CatnoLength(String),
}

pub type Result<T> = std::result::Result<T, InvalidMetadata>;

/// Check a final record against the tracker's upload rules.
///
/// Returns the first broken rule. Safe to run again after the user edits
/// the record.
pub fn validate_release(release: &Release) -> Result<()> {
    if release.title.trim().is_empty() {
        return Err(InvalidMetadata::EmptyTitle);
    }
    if !release.artists.iter().any(|a| a.role == Role::Main) {
        return Err(InvalidMetadata::NoMainArtist);
    }
    if let Some(track) = release.tracks.iter().find(|t| !t.has_role(Role::Main)) {
        return Err(InvalidMetadata::TrackWithoutMainArtist {
            disc: track.disc.clone(),
            track: track.number.clone(),
        });
    }
    let year = release.year.ok_or(InvalidMetadata::MissingYear)?;
    if release.rls_type.is_none() {
        return Err(InvalidMetadata::MissingReleaseType);
    }
    if release.genres.is_empty() {
        return Err(InvalidMetadata::NoGenres);
    }
    if let Some(media) = &release.media {
        if !MEDIA.contains(&media.as_str()) {
            return Err(InvalidMetadata::InvalidMedia(media.clone()));
        }
        if media == "CD" && year < FIRST_CD_YEAR {
            return Err(InvalidMetadata::CdTooOld(year));
        }
    }
    if let Some(label) = &release.label {
        if !FIELD_LENGTH.contains(&label.chars().count()) {
            return Err(InvalidMetadata::LabelLength(label.clone()));
        }
    }
    if let Some(catno) = &release.catno {
        if !FIELD_LENGTH.contains(&catno.chars().count()) {
            return Err(InvalidMetadata::CatnoLength(catno.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{Artist, ReleaseType, Track};

    fn make_release() -> Release {
        Release {
            title: "Music Has the Right to Children".into(),
            artists: vec![Artist::main("Boards of Canada")],
            year: Some(1998),
            rls_type: Some(ReleaseType::Album),
            genres: vec!["Electronic".into()],
            media: Some("CD".into()),
            label: Some("Warp".into()),
            catno: Some("WARPCD55".into()),
            tracks: [Track::new("1", "1", "Wildlife Analysis", vec![Artist::main("Boards of Canada")])]
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_release() {
        assert_eq!(validate_release(&make_release()), Ok(()));
    }

    #[test]
    fn test_main_artist_required() {
        let mut release = make_release();
        release.artists = vec![Artist::new("Boards of Canada", Role::Guest)];
        assert_eq!(validate_release(&release), Err(InvalidMetadata::NoMainArtist));
    }

    #[test]
    fn test_track_main_artist_required() {
        let mut release = make_release();
        for track in release.tracks.iter_mut() {
            track.artists = vec![Artist::new("Boards of Canada", Role::Remixer)];
        }
        assert_eq!(
            validate_release(&release),
            Err(InvalidMetadata::TrackWithoutMainArtist {
                disc: "1".into(),
                track: "1".into()
            })
        );
    }

    #[test]
    fn test_missing_fields() {
        let mut release = make_release();
        release.year = None;
        assert_eq!(validate_release(&release), Err(InvalidMetadata::MissingYear));

        let mut release = make_release();
        release.rls_type = None;
        assert_eq!(validate_release(&release), Err(InvalidMetadata::MissingReleaseType));

        let mut release = make_release();
        release.genres.clear();
        assert_eq!(validate_release(&release), Err(InvalidMetadata::NoGenres));
    }

    #[test]
    fn test_cd_before_1982() {
        let mut release = make_release();
        release.year = Some(1979);
        assert_eq!(validate_release(&release), Err(InvalidMetadata::CdTooOld(1979)));

        release.media = Some("Vinyl".into());
        assert_eq!(validate_release(&release), Ok(()));
    }

    #[test]
    fn test_unknown_media() {
        let mut release = make_release();
        release.media = Some("Reel".into());
        assert_eq!(
            validate_release(&release),
            Err(InvalidMetadata::InvalidMedia("Reel".into()))
        );
    }

    #[test]
    fn test_label_and_catno_length() {
        let mut release = make_release();
        release.label = Some("W".into());
        assert_eq!(validate_release(&release), Err(InvalidMetadata::LabelLength("W".into())));

        let mut release = make_release();
        release.catno = Some("X".repeat(81));
        assert_eq!(
            validate_release(&release),
            Err(InvalidMetadata::CatnoLength("X".repeat(81)))
        );
    }
}
