use std::path::PathBuf;
use std::time::Duration;

use crate::lyrics::LyricLine;

#[derive(Debug, Clone, PartialEq)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub artist: Option<String>,
    pub cover: Option<PathBuf>,
    /// Directory the manifest was loaded from.
    pub dir: PathBuf,
    /// Sorted by `track_number`.
    pub tracks: Vec<Track>,
}

impl Album {
    /// "Title (Year)", as shown in the gallery.
    pub fn display(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub track_number: u32,
    pub title: String,
    /// Audio file, resolved against the album directory.
    pub audio: PathBuf,
    /// Plain lyric text, shown when no timed lyrics exist.
    pub lyrics: Option<String>,
    /// Validated: finite, non-negative, non-decreasing timestamps.
    pub timed_lyrics: Option<Vec<LyricLine>>,
    pub credits: Option<String>,
    pub duration: Option<Duration>,
}

impl Track {
    /// "N. Title", as shown in the track list.
    pub fn display(&self) -> String {
        format!("{}. {}", self.track_number, self.title)
    }

    /// Timed lyric lines, or an empty slice.
    pub fn lines(&self) -> &[LyricLine] {
        self.timed_lyrics.as_deref().unwrap_or(&[])
    }

    pub fn has_lyrics(&self) -> bool {
        self.timed_lyrics.as_ref().is_some_and(|l| !l.is_empty())
            || self.lyrics.as_deref().is_some_and(|l| !l.trim().is_empty())
    }

    pub fn has_credits(&self) -> bool {
        self.credits.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}
