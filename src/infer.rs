//! Release type inference from the title and the shape of a record.
//!
//! Tiered, first match wins:
//! 1. title ends in "EP" / "E.P." → EP, suffix stripped
//! 2. title ends in "Single" → Single, suffix stripped
//! 3. title mentions an original soundtrack → Soundtrack
//! 4. more than four main artists → Compilation
//! 5. fewer than three tracks → Single
//! 6. fewer than five tracks → EP
//! 7. otherwise the type the source gave, if any
//!
//! Sources label nearly everything "Album", so tiers 4-6 override it.

use std::sync::LazyLock;

use regex::Regex;

use crate::release::{Release, ReleaseType, Role};

static EP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bE\.?P\.?$").unwrap());
static EP_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) ?-? *\bE\.?P\.?$").unwrap());
static SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bSingle$").unwrap());
static SINGLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) ?-? *\bSingle$").unwrap());
static SOUNDTRACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)original.*soundtrack").unwrap());

/// More main artists than this makes a compilation.
const COMPILATION_MAIN_ARTISTS: usize = 4;

/// The title and release type `release` should carry.
pub fn determine_rls_type(release: &Release) -> (String, Option<ReleaseType>) {
    let title = release.title.trim();

    // Tier 1-2: suffix printed by the source
    if EP_RE.is_match(title) {
        return (strip_suffix(&EP_SUFFIX_RE, title), Some(ReleaseType::Ep));
    }
    if SINGLE_RE.is_match(title) {
        return (strip_suffix(&SINGLE_SUFFIX_RE, title), Some(ReleaseType::Single));
    }

    // Tier 3
    if SOUNDTRACK_RE.is_match(title) {
        return (title.to_string(), Some(ReleaseType::Soundtrack));
    }

    // Tier 4-7: structure, then whatever the source said
    let inferred = if release.artist_names(Role::Main).len() > COMPILATION_MAIN_ARTISTS {
        Some(ReleaseType::Compilation)
    } else if release.tracks.is_empty() {
        release.rls_type
    } else if release.tracks.len() < 3 {
        Some(ReleaseType::Single)
    } else if release.tracks.len() < 5 {
        Some(ReleaseType::Ep)
    } else {
        release.rls_type
    };
    (title.to_string(), inferred)
}

/// Apply [`determine_rls_type`] to `release` in place.
pub fn infer_release_type(release: &mut Release) {
    let (title, rls_type) = determine_rls_type(release);
    if rls_type != release.rls_type {
        log::debug!("Release type of {:?}: {:?} → {:?}", release.title, release.rls_type, rls_type);
    }
    release.title = title;
    release.rls_type = rls_type;
}

fn strip_suffix(re: &Regex, title: &str) -> String {
    let stripped = re.replace(title, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        title.to_string()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::{Artist, Track, Tracks};

    fn make_release(title: &str, tracks: usize) -> Release {
        let tracks: Tracks = (1..=tracks)
            .map(|n| Track::new("1", n.to_string(), format!("Track {n}"), vec![Artist::main("Kavinsky")]))
            .collect();
        Release {
            title: title.to_string(),
            artists: vec![Artist::main("Kavinsky")],
            tracks,
            ..Default::default()
        }
    }

    fn inferred(release: Release) -> (String, Option<ReleaseType>) {
        let mut release = release;
        infer_release_type(&mut release);
        (release.title, release.rls_type)
    }

    #[test]
    fn test_ep_suffix_stripped() {
        assert_eq!(
            inferred(make_release("Night Drive EP", 10)),
            ("Night Drive".to_string(), Some(ReleaseType::Ep))
        );
        assert_eq!(
            inferred(make_release("Night Drive - E.P.", 10)),
            ("Night Drive".to_string(), Some(ReleaseType::Ep))
        );
        assert_eq!(
            inferred(make_release("Night Drive ep", 10)),
            ("Night Drive".to_string(), Some(ReleaseType::Ep))
        );
    }

    #[test]
    fn test_ep_needs_word_boundary() {
        assert_eq!(inferred(make_release("Keep Deep", 10)), ("Keep Deep".to_string(), None));
    }

    #[test]
    fn test_single_suffix_stripped() {
        assert_eq!(
            inferred(make_release("Nightcall - Single", 10)),
            ("Nightcall".to_string(), Some(ReleaseType::Single))
        );
    }

    #[test]
    fn test_soundtrack_title_unchanged() {
        assert_eq!(
            inferred(make_release("Drive (Original Motion Picture Soundtrack)", 19)),
            (
                "Drive (Original Motion Picture Soundtrack)".to_string(),
                Some(ReleaseType::Soundtrack)
            )
        );
    }

    #[test]
    fn test_many_main_artists_is_compilation() {
        let mut release = make_release("Summer Sampler", 10);
        release.artists = ["A", "B", "C", "D", "E"].into_iter().map(Artist::main).collect();
        assert_eq!(inferred(release).1, Some(ReleaseType::Compilation));
    }

    #[test]
    fn test_track_count_tiers() {
        assert_eq!(inferred(make_release("Nightcall", 2)).1, Some(ReleaseType::Single));
        assert_eq!(inferred(make_release("Nightcall", 4)).1, Some(ReleaseType::Ep));
        assert_eq!(inferred(make_release("OutRun", 13)).1, None);
    }

    #[test]
    fn test_structure_overrides_album() {
        let mut release = make_release("OutRun", 2);
        release.rls_type = Some(ReleaseType::Album);
        assert_eq!(inferred(release).1, Some(ReleaseType::Single));

        let mut release = make_release("OutRun", 4);
        release.rls_type = Some(ReleaseType::Album);
        assert_eq!(inferred(release).1, Some(ReleaseType::Ep));
    }

    #[test]
    fn test_existing_type_kept_for_full_length() {
        let mut release = make_release("OutRun", 13);
        release.rls_type = Some(ReleaseType::Album);
        assert_eq!(inferred(release).1, Some(ReleaseType::Album));

        let mut release = make_release("OutRun", 13);
        release.rls_type = Some(ReleaseType::Remix);
        assert_eq!(inferred(release).1, Some(ReleaseType::Remix));
    }

    #[test]
    fn test_title_suffix_overrides_existing_type() {
        let mut release = make_release("Night Drive EP", 10);
        release.rls_type = Some(ReleaseType::Album);
        assert_eq!(
            inferred(release),
            ("Night Drive".to_string(), Some(ReleaseType::Ep))
        );
    }

    #[test]
    fn test_bare_ep_title_kept() {
        assert_eq!(
            inferred(make_release("EP", 3)),
            ("EP".to_string(), Some(ReleaseType::Ep))
        );
    }
}
