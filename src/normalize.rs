//! String keys used to compare names and titles across sources.
//!
//! Every scraper formats text a little differently (case, accents,
//! punctuation, separators). These functions reduce strings to keys that
//! survive those differences. None of them are meant for display.

use std::sync::LazyLock;

use any_ascii::any_ascii;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/\-\\,]").unwrap());

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Remove diacritics: NFKD decomposition with combining marks dropped.
/// "Beyoncé" → "Beyonce". Letters without a decomposition ("ø") are kept.
pub fn normalize_accents(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Transliterate to ASCII ("Sigur Rós" → "Sigur Ros", "Кино" → "Kino").
pub fn transliterate(s: &str) -> String {
    any_ascii(s)
}

/// Lowercase, turn separators (`/ - \ ,`) into spaces, collapse runs of
/// spaces and drop periods and parentheses.
pub fn re_strip(s: &str) -> String {
    let lowered = s.to_lowercase();
    let spaced = SEPARATOR_RE.replace_all(&lowered, " ");
    let collapsed = MULTI_SPACE_RE.replace_all(&spaced, " ");
    collapsed.chars().filter(|c| !matches!(c, '.' | '(' | ')')).collect()
}

/// Key for deciding whether two track titles name the same recording.
pub fn title_key(title: Option<&str>) -> String {
    re_strip(&transliterate(title.unwrap_or_default()))
}

/// Key of the artist pool: lowercase with accents removed.
pub fn artist_key(name: &str) -> String {
    normalize_accents(&name.to_lowercase())
}

/// Key for deciding whether two credits name the same artist.
pub fn credit_key(name: &str) -> String {
    re_strip(&normalize_accents(name))
}

/// Alphanumerics only, accents removed, lowercased. "Leslie Odom, Jr." → "leslieodomjr".
pub fn sanitize_key(name: &str) -> String {
    normalize_accents(name)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

pub fn count_uppercase(s: &str) -> usize {
    s.chars().filter(|c| c.is_uppercase()).count()
}

/// The spelling with fewer uppercase letters; `current` wins ties.
pub fn less_uppers<'a>(current: &'a str, candidate: &'a str) -> &'a str {
    if count_uppercase(candidate) < count_uppercase(current) {
        candidate
    } else {
        current
    }
}
