use regex::Regex;
use std::sync::LazyLock;

use crate::release::{Artist, Role};

/// Separators between several artists in one tag value.
const SPLIT_SEPARATORS: &[&str] = &[r" \ ", "/", "; ", " & ", ", "];

static SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = SPLIT_SEPARATORS.iter().map(|s| regex::escape(s)).collect();
    Regex::new(&alternatives.join("|")).unwrap()
});

// " feat. X", " (ft. X)", " [featuring X]", " with X"
static FEAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i) [\(\[\{]?(?:f(?:ea)?t(?:uring)?\.?|with) ([^\)\]\}]+)[\)\]\}]?").unwrap()
});

// " (Remix X)", " remixed by X", " (Remix. X)"
static REMIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) \(?remix(?:ed by|ed|\.)? ([^\)]+)\)?").unwrap());

/// Split a tag value on the usual multi-artist separators.
pub fn split_names(value: &str) -> Vec<String> {
    SPLIT_RE
        .split(value)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn raw artist tag values into credits.
///
/// Featured artists become guests, "remixed by" credits become remixers,
/// and whatever remains is split into main artists.
pub fn parse_artists<S: AsRef<str>>(values: &[S]) -> Vec<Artist> {
    let mut artists = Vec::new();
    for value in values {
        let mut rest = value.as_ref().to_string();

        if let Some(caps) = FEAT_RE.captures(&rest) {
            for name in split_names(&caps[1]) {
                artists.push(Artist::new(name, Role::Guest));
            }
            let whole = caps[0].to_string();
            rest = rest.replace(&whole, "");
        }

        if let Some(caps) = REMIX_RE.captures(&rest) {
            for name in split_names(&caps[1]) {
                artists.push(Artist::new(name, Role::Remixer));
            }
            let whole = caps[0].to_string();
            rest = rest.replace(&whole, "");
        }

        for name in split_names(&rest) {
            artists.push(Artist::main(name));
        }
    }

    let mut unique: Vec<Artist> = Vec::with_capacity(artists.len());
    for artist in artists {
        if !unique.contains(&artist) {
            unique.push(artist);
        }
    }
    unique
}
