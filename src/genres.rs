//! Controlled genre vocabulary.
//!
//! Sources tag releases with their own taxonomies ("Hip-Hop/Rap",
//! "Electronica / Downtempo", "Deep House"). Known genres are mapped to a
//! small canonical set; anything unknown passes through untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Lookup key → canonical genres. Keys are in [`genre_key`] form.
const VOCABULARY: &[(&str, &[&str])] = &[
    ("electronic", &["Electronic"]),
    ("electronica", &["Electronic"]),
    ("electronicadowntempo", &["Electronic", "Downtempo"]),
    ("dance", &["Dance"]),
    ("house", &["House"]),
    ("deephouse", &["House", "Deep House"]),
    ("techhouse", &["House", "Tech House"]),
    ("progressivehouse", &["House", "Progressive House"]),
    ("leftfieldhouseandtechno", &["Leftfield House", "Techno"]),
    ("melodichouseandtechno", &["Melodic House", "Techno"]),
    ("funkygroovejackinhouse", &["Funky", "Groove", "Jackin' House"]),
    ("techno", &["Techno"]),
    ("hardcorehardtechno", &["Hard Techno"]),
    ("minimaldeeptech", &["Minimal", "Deep Tech"]),
    ("trance", &["Trance"]),
    ("ambient", &["Ambient"]),
    ("downtempo", &["Downtempo"]),
    ("drumandbass", &["Drum and Bass"]),
    ("drumnbass", &["Drum and Bass"]),
    ("dnb", &["Drum and Bass"]),
    ("jungle", &["Jungle"]),
    ("dubstep", &["Dubstep"]),
    ("garage", &["Garage"]),
    ("ukgarage", &["UK Garage"]),
    ("garagebasslinegrime", &["Garage", "Bassline", "Grime"]),
    ("trapfuturebass", &["Trap", "Future Bass"]),
    ("disco", &["Disco"]),
    ("nudisco", &["Nu Disco"]),
    ("indiedancenudisco", &["Indie Dance", "Nu Disco"]),
    ("funksouldisco", &["Funk", "Soul", "Disco"]),
    ("hiphop", &["Hip Hop"]),
    ("rap", &["Rap"]),
    ("hiphoprap", &["Hip Hop", "Rap"]),
    ("hiphoprandb", &["Hip Hop", "Rhythm and Blues"]),
    ("randb", &["Rhythm and Blues"]),
    ("rnb", &["Rhythm and Blues"]),
    ("rhythmandblues", &["Rhythm and Blues"]),
    ("randbsoul", &["Rhythm and Blues", "Soul"]),
    ("soul", &["Soul"]),
    ("funk", &["Funk"]),
    ("jazz", &["Jazz"]),
    ("blues", &["Blues"]),
    ("pop", &["Pop"]),
    ("synthpop", &["Pop", "Synth Pop"]),
    ("rock", &["Rock"]),
    ("alternative", &["Alternative"]),
    ("alternativerock", &["Rock", "Alternative"]),
    ("indie", &["Indie"]),
    ("indiepop", &["Indie", "Pop"]),
    ("indierock", &["Indie", "Rock"]),
    ("punk", &["Punk"]),
    ("metal", &["Metal"]),
    ("heavymetal", &["Metal"]),
    ("folk", &["Folk"]),
    ("country", &["Country"]),
    ("classical", &["Classical"]),
    ("experimental", &["Experimental"]),
    ("reggae", &["Reggae"]),
    ("dancehall", &["Dancehall"]),
    ("dub", &["Dub"]),
    ("reggaedancehalldub", &["Reggae", "Dancehall", "Dub"]),
    ("soundtrack", &["Soundtrack"]),
    ("world", &["World"]),
    ("worldmusic", &["World"]),
    ("latin", &["Latin"]),
    // Catch-all tags that carry no information.
    ("music", &[]),
];

static LOOKUP: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| VOCABULARY.iter().copied().collect());

/// Lowercase, `&` spelled out, everything but `a-z` removed.
/// "Hip-Hop / R&B" → "hiphoprandb".
pub fn genre_key(genre: &str) -> String {
    genre
        .to_lowercase()
        .replace('&', "and")
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// The canonical genres for a known `genre`, `None` if it is not in the vocabulary.
pub fn lookup(genre: &str) -> Option<&'static [&'static str]> {
    LOOKUP.get(genre_key(genre).as_str()).copied()
}

/// Replace known genres by their canonical sets, keep unknown ones as-is.
pub fn standardize(genres: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(genres.len());
    for genre in genres {
        match lookup(genre) {
            Some(canonical) => out.extend(canonical.iter().map(|g| g.to_string())),
            None => out.push(genre.clone()),
        }
    }
    dedupe(out)
}

/// Drop case-insensitive duplicates, keeping the first spelling and the order.
pub fn dedupe(genres: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(genres.len());
    let mut out = Vec::with_capacity(genres.len());
    for genre in genres {
        let lowered = genre.to_lowercase();
        if !seen.contains(&lowered) {
            seen.push(lowered);
            out.push(genre);
        }
    }
    out
}

/// Remove genres on `blacklist`, compared case-insensitively.
pub fn remove_blacklisted(genres: Vec<String>, blacklist: &[String]) -> Vec<String> {
    genres
        .into_iter()
        .filter(|g| !blacklist.iter().any(|b| b.eq_ignore_ascii_case(g)))
        .collect()
}
