//! Repair artist names that a scraper split on a delimiter it should not
//! have, e.g. "Leslie Odom, Jr." credited as "Leslie Odom" and "Jr.".
//!
//! A pair of credits is treated as fragments when their sanitized keys,
//! joined in either order, equal the key of a third credit in the same
//! pool. Only names already present in the pool can be produced, so the
//! fixer never invents an artist.

use crate::normalize::sanitize_key;
use crate::release::{Artist, Role};

/// Credits named in `fragments` collapse into `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub fragments: Vec<String>,
    pub replacement: String,
}

/// Find every fragment pair in `artists`.
///
/// Pairwise over the distinct names, shortest keys first. Pools are a
/// handful of names per release, so the quadratic scan is fine.
pub fn construct_replacement_list(artists: &[Artist]) -> Vec<Replacement> {
    let mut pool: Vec<(String, &str)> = Vec::new();
    for artist in artists {
        if !pool.iter().any(|(_, name)| *name == artist.name) {
            pool.push((sanitize_key(&artist.name), &artist.name));
        }
    }
    pool.sort_by_key(|(key, _)| key.chars().count());

    let mut rules: Vec<Replacement> = Vec::new();
    for (i, (key_a, name_a)) in pool.iter().enumerate() {
        if key_a.is_empty() {
            continue;
        }
        for (key_b, name_b) in pool[..i].iter().rev() {
            if key_b.is_empty() {
                continue;
            }
            let joined = [format!("{key_b}{key_a}"), format!("{key_a}{key_b}")];
            for (key_c, name_c) in &pool[i + 1..] {
                if name_c == name_a || name_c == name_b || !joined.contains(key_c) {
                    continue;
                }
                let rule = Replacement {
                    fragments: vec![name_a.to_string(), name_b.to_string()],
                    replacement: name_c.to_string(),
                };
                if !rules.contains(&rule) {
                    log::debug!(
                        "Artist fragments {:?} + {:?} look like {:?}",
                        name_b,
                        name_a,
                        name_c
                    );
                    rules.push(rule);
                }
            }
        }
    }
    rules
}

/// Apply `rules` to a credit list, one role at a time.
///
/// Within a role, every fragment of a rule is removed; if anything was
/// removed and the role does not already credit the replacement, the
/// replacement takes the place of the first removed fragment.
pub fn fix_artists_list(mut artists: Vec<Artist>, rules: &[Replacement]) -> Vec<Artist> {
    if rules.is_empty() {
        return artists;
    }

    let mut roles: Vec<Role> = Vec::new();
    for artist in &artists {
        if !roles.contains(&artist.role) {
            roles.push(artist.role);
        }
    }

    for role in roles {
        for rule in rules {
            let is_fragment =
                |a: &Artist| a.role == role && rule.fragments.iter().any(|f| *f == a.name);
            let Some(first) = artists.iter().position(is_fragment) else {
                continue;
            };
            artists.retain(|a| !is_fragment(a));
            let present = artists
                .iter()
                .any(|a| a.role == role && a.name == rule.replacement);
            if !present {
                let at = first.min(artists.len());
                artists.insert(at, Artist::new(rule.replacement.clone(), role));
            }
        }
    }
    artists
}

/// Build the rules from `artists` and apply them to the same list.
pub fn check_for_artist_fragments(artists: Vec<Artist>) -> Vec<Artist> {
    let rules = construct_replacement_list(&artists);
    fix_artists_list(artists, &rules)
}
