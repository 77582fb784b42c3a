//! On-disk album manifest format.
//!
//! ```toml
//! title = "Night Garden"
//! year = 2023
//! cover = "cover.jpg"
//!
//! [[tracks]]
//! track_number = 1
//! title = "Opening"
//! audio = "01-opening.flac"
//! credits = "Written by ..."
//! timed_lyrics = [
//!     { time = 0.0, line = "first line" },
//!     { time = 4.2, line = "second line" },
//! ]
//! ```
//!
//! Field names follow the hosted schema the gallery used to be served from, so
//! `cover_url` / `audio_url` are accepted as aliases and a JSON export of the
//! same rows loads unchanged.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lyrics::LyricLine;

use super::error::CatalogError;

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumManifest {
    pub id: Option<String>,
    pub title: String,
    pub year: i32,
    pub artist: Option<String>,
    #[serde(alias = "cover_url")]
    pub cover: Option<String>,
    #[serde(default)]
    pub tracks: Vec<TrackManifest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackManifest {
    pub id: Option<String>,
    pub track_number: u32,
    pub title: String,
    #[serde(alias = "audio_url")]
    pub audio: String,
    pub lyrics: Option<String>,
    pub timed_lyrics: Option<Vec<LyricLine>>,
    /// LRC file with timed lyrics, relative to the manifest.
    pub lyrics_file: Option<String>,
    pub credits: Option<String>,
}

impl AlbumManifest {
    /// Parse a manifest, picking the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => toml::from_str(&text).map_err(|e| CatalogError::manifest(path, e)),
            Some("json") => {
                serde_json::from_str(&text).map_err(|e| CatalogError::manifest(path, e))
            }
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Resolve a manifest-relative reference against the album directory.
/// Absolute paths are kept as they are.
pub fn resolve(dir: &Path, reference: &str) -> PathBuf {
    let p = Path::new(reference.trim());
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        dir.join(p)
    }
}

/// Check that timestamps are finite, non-negative and non-decreasing.
pub fn validate_timed_lyrics(
    path: &Path,
    track: &str,
    lines: &[LyricLine],
) -> Result<(), CatalogError> {
    let mut previous: Option<f64> = None;
    for (index, l) in lines.iter().enumerate() {
        if !l.time.is_finite() || l.time < 0.0 {
            return Err(CatalogError::InvalidTimestamp {
                path: path.to_path_buf(),
                track: track.to_string(),
                index,
                time: l.time,
            });
        }
        if let Some(prev) = previous {
            if l.time < prev {
                return Err(CatalogError::UnorderedLyrics {
                    path: path.to_path_buf(),
                    track: track.to_string(),
                    index,
                    time: l.time,
                    previous: prev,
                });
            }
        }
        previous = Some(l.time);
    }
    Ok(())
}
