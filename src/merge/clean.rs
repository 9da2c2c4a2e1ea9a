use crate::normalize::re_strip;
use crate::release::{Release, Role, Track};

/// Tidy a merged record before its artists are regenerated.
pub fn clean_release(release: &mut Release) {
    for track in release.tracks.iter_mut() {
        remove_various_artists(track);
        drop_redundant_main_credits(track);
    }
    clear_catno_if_upc(release);
}

/// A placeholder "Various Artists" credit is not an artist.
pub fn remove_various_artists(track: &mut Track) {
    track.artists.retain(|a| {
        let name = a.name.trim().to_lowercase();
        name != "various artists" && name != "various"
    });
}

/// Drop a main credit that the same track also lists as guest or
/// remixer, unless it is the track's only main artist.
fn drop_redundant_main_credits(track: &mut Track) {
    let featured: Vec<String> = track
        .artists
        .iter()
        .filter(|a| matches!(a.role, Role::Guest | Role::Remixer))
        .map(|a| re_strip(&a.name))
        .collect();
    if featured.is_empty() {
        return;
    }

    let mut mains = track.artists.iter().filter(|a| a.role == Role::Main).count();
    track.artists.retain(|a| {
        if a.role != Role::Main || mains <= 1 || !featured.contains(&re_strip(&a.name)) {
            return true;
        }
        log::debug!("Dropping main credit {:?}, also featured", a.name);
        mains -= 1;
        false
    });
}

/// Some sources put the barcode in the catalogue number field.
pub fn clear_catno_if_upc(release: &mut Release) {
    let is_upc = match (&release.catno, &release.upc) {
        (Some(catno), Some(upc)) => catno.replace(' ', "") == *upc,
        _ => false,
    };
    if is_upc {
        release.catno = None;
    }
}
