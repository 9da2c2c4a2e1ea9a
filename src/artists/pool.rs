use std::collections::HashMap;

use crate::normalize::{artist_key, less_uppers};
use crate::release::Tracks;

/// Case/accent-insensitive identity map from artist key to one display spelling.
#[derive(Debug, Default, Clone)]
pub struct ArtistPool {
    canonical: HashMap<String, String>,
}

impl ArtistPool {
    /// Build the pool from every credit on every track.
    ///
    /// The first spelling seen for a key is kept unless a later one has
    /// fewer uppercase letters, so "Daft Punk" beats "DAFT PUNK" whichever
    /// source listed it first.
    pub fn from_tracks(tracks: &Tracks) -> Self {
        let mut pool = Self::default();
        for track in tracks.iter() {
            for artist in &track.artists {
                pool.add(&artist.name);
            }
        }
        pool
    }

    fn add(&mut self, name: &str) {
        let current = self
            .canonical
            .entry(artist_key(name))
            .or_insert_with(|| name.to_string());
        if current.as_str() != name {
            let preferred = less_uppers(current, name).to_string();
            *current = preferred;
        }
    }

    /// The canonical spelling for `name`, or `name` itself if it was never pooled.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.canonical
            .get(&artist_key(name))
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}
