use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::merge::{MergeOptions, PREFERENCES};
use crate::prepare::PrepareOptions;

/// Application configuration loaded from TOML config file.
/// All fields have defaults; the config file is optional.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Source names in merge preference order, highest first.
    pub preferences: Vec<String>,
    /// Genres dropped from scraped records (case-insensitive).
    pub blacklisted_genres: Vec<String>,
    /// Remixer count at which a track title gets "(Remixed)" instead of names.
    pub various_artist_threshold: usize,
    /// Tracks without replay gain take each source's title spelling.
    pub replay_gain_sets_title: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let merge = MergeOptions::default();
        let prepare = PrepareOptions::default();
        Self {
            preferences: PREFERENCES.iter().map(|s| s.to_string()).collect(),
            blacklisted_genres: prepare.blacklisted_genres,
            various_artist_threshold: prepare.various_artist_threshold,
            replay_gain_sets_title: merge.replay_gain_sets_title,
        }
    }
}

impl AppConfig {
    /// Load config from `path`, or from `~/.config/rlsmerge/config.toml`.
    /// Returns default config if the file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = path.map(Path::to_path_buf).or_else(Self::config_path);
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            preferences: self.preferences.clone(),
            replay_gain_sets_title: self.replay_gain_sets_title,
        }
    }

    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            various_artist_threshold: self.various_artist_threshold,
            blacklisted_genres: self.blacklisted_genres.clone(),
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.preferences.first().map(String::as_str), Some("Tidal"));
        assert_eq!(config.various_artist_threshold, 4);
        assert!(config.replay_gain_sets_title);
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::parse(
            r#"
            preferences = ["Bandcamp", "Discogs"]
            blacklisted_genres = ["Soundtrack", "Asian Music"]
            replay_gain_sets_title = false
            "#,
        )
        .unwrap();
        assert_eq!(config.various_artist_threshold, 4);

        let merge = config.merge_options();
        assert_eq!(merge.preferences, vec!["Bandcamp".to_string(), "Discogs".to_string()]);
        assert!(!merge.replay_gain_sets_title);

        let prepare = config.prepare_options();
        assert_eq!(prepare.blacklisted_genres.len(), 2);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(AppConfig::parse("various_artist_threshold = \"four\"").is_err());
    }

    #[test]
    fn test_missing_explicit_path_gives_defaults() {
        let path = std::env::temp_dir().join("rlsmerge-no-such-config.toml");
        assert_eq!(AppConfig::load(Some(&path)), AppConfig::default());
    }
}
