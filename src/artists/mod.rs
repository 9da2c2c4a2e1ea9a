pub mod credits;
pub mod fragments;
pub mod pool;

use crate::release::{Artist, Tracks};

use fragments::{construct_replacement_list, fix_artists_list};
use pool::ArtistPool;

/// Derive the release-level credit list from the tracks.
///
/// Every track credit is mapped to its canonical spelling, collected in
/// first-appearance order, then run through the fragment fixer. Returns
/// the release credits and the tracks with their credits fixed the same
/// way. Running it again on its own output changes nothing.
pub fn generate_artists(tracks: Tracks) -> (Vec<Artist>, Tracks) {
    let pool = ArtistPool::from_tracks(&tracks);
    let mut artists: Vec<Artist> = Vec::new();
    for track in tracks.iter() {
        for credit in &track.artists {
            let artist = Artist::new(pool.canonical(&credit.name), credit.role);
            if !artists.contains(&artist) {
                artists.push(artist);
            }
        }
    }
    filter_artists(artists, tracks)
}

/// Fix badly split credits in `artists`, then apply the same replacements
/// to every track so track credits agree with the release credits.
pub fn filter_artists(artists: Vec<Artist>, mut tracks: Tracks) -> (Vec<Artist>, Tracks) {
    let rules = construct_replacement_list(&artists);
    let artists = fix_artists_list(artists, &rules);

    let pool = ArtistPool::from_tracks(&tracks);
    for track in tracks.iter_mut() {
        let mut canonical: Vec<Artist> = Vec::with_capacity(track.artists.len());
        for credit in &track.artists {
            let artist = Artist::new(pool.canonical(&credit.name), credit.role);
            if !canonical.contains(&artist) {
                canonical.push(artist);
            }
        }
        track.artists = fix_artists_list(canonical, &rules);
    }

    (artists, tracks)
}
