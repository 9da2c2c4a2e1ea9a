use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Track;

/// One disc (or vinyl side) of a release, tracks in published order.
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    pub number: String,
    pub tracks: Vec<Track>,
}

/// The disc → track mapping of a release.
///
/// Keys are strings because some sources label vinyl sides "A", "B".
/// Insertion order is significant: tracks from different sources are
/// paired by position, so this type never reorders what it is given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tracks {
    discs: Vec<Disc>,
}

impl Tracks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a track under its own `disc`/`number`, replacing any track
    /// already stored at that position. New discs and tracks are appended.
    pub fn insert(&mut self, track: Track) {
        let index = match self.discs.iter().position(|d| d.number == track.disc) {
            Some(i) => i,
            None => {
                self.discs.push(Disc {
                    number: track.disc.clone(),
                    tracks: Vec::new(),
                });
                self.discs.len() - 1
            }
        };
        let disc = &mut self.discs[index];
        match disc.tracks.iter_mut().find(|t| t.number == track.number) {
            Some(existing) => *existing = track,
            None => disc.tracks.push(track),
        }
    }

    pub fn get(&self, disc: &str, number: &str) -> Option<&Track> {
        self.discs
            .iter()
            .find(|d| d.number == disc)
            .and_then(|d| d.tracks.iter().find(|t| t.number == number))
    }

    pub fn discs(&self) -> &[Disc] {
        &self.discs
    }

    /// All tracks, disc by disc, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.discs.iter().flat_map(|d| d.tracks.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.discs.iter_mut().flat_map(|d| d.tracks.iter_mut())
    }

    /// Total number of tracks across all discs.
    pub fn len(&self) -> usize {
        self.discs.iter().map(|d| d.tracks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn disc_count(&self) -> usize {
        self.discs.len()
    }

    /// Recompute `tracktotal`/`disctotal` from the current structure.
    pub fn assign_totals(&mut self) {
        let disctotal = self.discs.len() as u32;
        for disc in &mut self.discs {
            let tracktotal = disc.tracks.len() as u32;
            for track in &mut disc.tracks {
                track.tracktotal = Some(tracktotal);
                track.disctotal = Some(disctotal);
            }
        }
    }
}

impl FromIterator<Track> for Tracks {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut tracks = Tracks::new();
        for track in iter {
            tracks.insert(track);
        }
        tracks
    }
}

struct DiscTracks<'a>(&'a [Track]);

impl Serialize for DiscTracks<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for track in self.0 {
            map.serialize_entry(&track.number, track)?;
        }
        map.end()
    }
}

impl Serialize for Tracks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.discs.len()))?;
        for disc in &self.discs {
            map.serialize_entry(&disc.number, &DiscTracks(&disc.tracks))?;
        }
        map.end()
    }
}

/// Entries of one disc's track map, kept in document order.
struct DiscEntries(Vec<(String, Track)>);

impl<'de> Deserialize<'de> for DiscEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = DiscEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of track numbers to tracks")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, Track>()? {
                    entries.push(entry);
                }
                Ok(DiscEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl<'de> Deserialize<'de> for Tracks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TracksVisitor;

        impl<'de> Visitor<'de> for TracksVisitor {
            type Value = Tracks;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of disc numbers to track maps")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut tracks = Tracks::new();
                while let Some((disc, DiscEntries(entries))) =
                    access.next_entry::<String, DiscEntries>()?
                {
                    for (number, mut track) in entries {
                        track.number = number;
                        track.disc = disc.clone();
                        tracks.insert(track);
                    }
                }
                Ok(tracks)
            }
        }

        deserializer.deserialize_map(TracksVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::Artist;

    fn make_track(disc: &str, number: &str, title: &str) -> Track {
        Track::new(disc, number, title, vec![Artist::main("Artist")])
    }

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut tracks = Tracks::new();
        tracks.insert(make_track("1", "2", "Second"));
        tracks.insert(make_track("1", "1", "First"));
        tracks.insert(make_track("B", "1", "Flip"));
        tracks.insert(make_track("1", "2", "Second (Edit)"));

        let titles: Vec<_> = tracks.iter().map(|t| t.title.as_deref().unwrap()).collect();
        assert_eq!(titles, vec!["Second (Edit)", "First", "Flip"]);
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks.disc_count(), 2);
    }

    #[test]
    fn test_assign_totals() {
        let mut tracks: Tracks = [
            make_track("1", "1", "a"),
            make_track("1", "2", "b"),
            make_track("2", "1", "c"),
        ]
        .into_iter()
        .collect();
        tracks.assign_totals();

        let totals: Vec<_> = tracks.iter().map(|t| (t.tracktotal, t.disctotal)).collect();
        assert_eq!(
            totals,
            vec![(Some(2), Some(2)), (Some(2), Some(2)), (Some(1), Some(2))]
        );
    }

    #[test]
    fn test_json_preserves_document_order() {
        // Keys deliberately out of lexical order; positional matching relies on this order.
        let json = r#"{
            "2": {"1": {"title": "c"}},
            "1": {"10": {"title": "b"}, "9": {"title": "a"}}
        }"#;
        let tracks: Tracks = serde_json::from_str(json).unwrap();
        let order: Vec<_> = tracks
            .iter()
            .map(|t| (t.disc.as_str(), t.number.as_str()))
            .collect();
        assert_eq!(order, vec![("2", "1"), ("1", "10"), ("1", "9")]);

        let out = serde_json::to_string(&tracks).unwrap();
        assert!(out.starts_with(r#"{"2":{"1":"#));
        assert!(out.find(r#""10":"#).unwrap() < out.find(r#""9":"#).unwrap());
    }

    #[test]
    fn test_map_keys_override_echo_fields() {
        let json = r#"{"A": {"1": {"track#": "7", "disc#": "9", "title": "Side A"}}}"#;
        let tracks: Tracks = serde_json::from_str(json).unwrap();
        let t = tracks.get("A", "1").unwrap();
        assert_eq!(t.number, "1");
        assert_eq!(t.disc, "A");
    }
}
