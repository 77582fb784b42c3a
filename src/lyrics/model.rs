use serde::Deserialize;

/// One timestamped lyric line, as stored in an album manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LyricLine {
    /// Start of the line, in seconds from the beginning of the track.
    pub time: f64,
    pub line: String,
}

impl LyricLine {
    pub fn new(time: f64, line: impl Into<String>) -> Self {
        Self {
            time,
            line: line.into(),
        }
    }
}
