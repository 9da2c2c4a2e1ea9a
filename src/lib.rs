pub mod artists;
pub mod config;
pub mod genres;
pub mod infer;
pub mod merge;
pub mod normalize;
pub mod prepare;
pub mod release;
pub mod scanner;
pub mod validate;

/// Application name for XDG paths
pub const APP_NAME: &str = "rlsmerge";
