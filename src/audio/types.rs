//! Commands, events and errors shared between the UI and the audio thread.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Identifies one `Play` request. Events carry the token of the request they
/// belong to so that stale events from a previous track can be dropped.
pub type PlayToken = u64;

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing `path` from the beginning.
    Play { token: PlayToken, path: PathBuf },
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Signals emitted by the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// Current position of the playing track.
    TimeUpdate { token: PlayToken, position: Duration },
    Paused { token: PlayToken },
    Resumed { token: PlayToken },
    /// The track played to the end.
    Ended { token: PlayToken },
    /// The track could not be played at all.
    Failed { token: PlayToken, message: String },
}

impl DriverEvent {
    pub fn token(&self) -> PlayToken {
        match self {
            Self::TimeUpdate { token, .. }
            | Self::Paused { token }
            | Self::Resumed { token }
            | Self::Ended { token }
            | Self::Failed { token, .. } => *token,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutput(String),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Position after seeking `secs` from `elapsed`, never before the start.
pub(crate) fn seek_target(elapsed: Duration, secs: i32) -> Duration {
    let delta = Duration::from_secs(secs.unsigned_abs() as u64);
    if secs >= 0 {
        elapsed.saturating_add(delta)
    } else {
        elapsed.saturating_sub(delta)
    }
}
