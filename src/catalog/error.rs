use std::path::PathBuf;

use thiserror::Error;

/// Reasons an album manifest (or one of its lyric files) could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest {path:?}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("unsupported manifest format {0:?} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("{path:?}: track {track:?}, lyric line {index} has invalid timestamp {time}")]
    InvalidTimestamp {
        path: PathBuf,
        track: String,
        index: usize,
        time: f64,
    },

    #[error(
        "{path:?}: track {track:?}, lyric line {index} starts at {time}s, before the previous line at {previous}s"
    )]
    UnorderedLyrics {
        path: PathBuf,
        track: String,
        index: usize,
        time: f64,
        previous: f64,
    },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn manifest(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
