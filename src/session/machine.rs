use std::time::Duration;

use tracing::{debug, info};

use crate::audio::PlayToken;
use crate::config::LoopModeSetting;
use crate::lyrics::{LyricLine, active_line_index};

/// Where the session is in the life of a track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No track loaded.
    #[default]
    Idle,
    /// Time updates are arriving.
    Playing,
    Paused,
    /// The current track finished and nothing followed it.
    Ended,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Stop after the last track.
    #[default]
    NoLoop,
    /// Wrap around to the first track.
    LoopAll,
    /// Repeat the current track when it ends.
    LoopOne,
}

impl LoopMode {
    /// Cycle `NoLoop -> LoopAll -> LoopOne -> NoLoop`.
    pub fn cycled(self) -> Self {
        match self {
            Self::NoLoop => Self::LoopAll,
            Self::LoopAll => Self::LoopOne,
            Self::LoopOne => Self::NoLoop,
        }
    }
}

impl From<LoopModeSetting> for LoopMode {
    fn from(s: LoopModeSetting) -> Self {
        match s {
            LoopModeSetting::NoLoop => Self::NoLoop,
            LoopModeSetting::LoopAll => Self::LoopAll,
            LoopModeSetting::LoopOne => Self::LoopOne,
        }
    }
}

/// Work for the runtime to carry out on behalf of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start track `index` of the loaded album from the beginning.
    Play { index: usize, token: PlayToken },
    TogglePause,
    SeekBy(i32),
    Stop,
}

/// Playback state for one album.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    track_count: usize,
    current: Option<usize>,
    /// Seconds into the current track.
    position: f64,
    state: SessionState,
    token: PlayToken,
    pub loop_mode: LoopMode,
    pub auto_advance: bool,
    last_error: Option<String>,
}

impl PlaybackSession {
    pub fn new(loop_mode: LoopMode, auto_advance: bool) -> Self {
        Self {
            loop_mode,
            auto_advance,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the selected track, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.position.max(0.0))
    }

    pub fn token(&self) -> PlayToken {
        self.token
    }

    pub fn track_count(&self) -> usize {
        self.track_count
    }

    /// Message of the last playback failure, cleared by the next selection.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Active lyric line for `lines` at the current position. Derived on every
    /// call; the session never stores it.
    pub fn active_line(&self, lines: &[LyricLine]) -> Option<usize> {
        if self.current.is_none() {
            return None;
        }
        active_line_index(lines, self.position)
    }

    /// Switch to an album with `track_count` tracks. Stops whatever played.
    pub fn load_album(&mut self, track_count: usize) -> Vec<Effect> {
        let effects = self.stop();
        self.track_count = track_count;
        effects
    }

    /// Select track `index`: reset the position and start playing it.
    pub fn select(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.track_count {
            debug!(index, tracks = self.track_count, "Ignoring out-of-range selection");
            return Vec::new();
        }

        self.token = self.token.wrapping_add(1);
        self.current = Some(index);
        self.position = 0.0;
        self.state = SessionState::Playing;
        self.last_error = None;

        info!(index, token = self.token, "Selecting track");
        vec![Effect::Play {
            index,
            token: self.token,
        }]
    }

    fn is_live(&self, token: PlayToken) -> bool {
        token == self.token && matches!(self.state, SessionState::Playing | SessionState::Paused)
    }

    /// Driver time-update. Returns false when the update was stale and ignored.
    pub fn on_time_update(&mut self, token: PlayToken, position: Duration) -> bool {
        if !self.is_live(token) {
            return false;
        }
        self.position = position.as_secs_f64();
        true
    }

    pub fn on_paused(&mut self, token: PlayToken) {
        if self.is_live(token) {
            self.state = SessionState::Paused;
        }
    }

    pub fn on_resumed(&mut self, token: PlayToken) {
        if self.is_live(token) {
            self.state = SessionState::Playing;
        }
    }

    /// Driver completion signal: advance if there is somewhere to go,
    /// otherwise stay `Ended`.
    pub fn on_ended(&mut self, token: PlayToken) -> Vec<Effect> {
        if !self.is_live(token) {
            return Vec::new();
        }
        let Some(current) = self.current else {
            return Vec::new();
        };

        self.state = SessionState::Ended;
        if !self.auto_advance {
            return Vec::new();
        }

        match self.loop_mode {
            LoopMode::LoopOne => self.select(current),
            LoopMode::LoopAll if current + 1 >= self.track_count => self.select(0),
            _ if current + 1 < self.track_count => self.select(current + 1),
            _ => {
                info!(index = current, "Reached the end of the album");
                Vec::new()
            }
        }
    }

    /// The driver could not play the selected track.
    pub fn on_failed(&mut self, token: PlayToken, message: String) {
        if token != self.token {
            return;
        }
        self.state = SessionState::Idle;
        self.position = 0.0;
        self.last_error = Some(message);
    }

    /// Play/pause. From `Idle` this plays `fallback` (usually the track under
    /// the cursor); from `Ended` it restarts the current track.
    pub fn toggle_pause(&mut self, fallback: usize) -> Vec<Effect> {
        match self.state {
            SessionState::Idle => self.select(fallback),
            SessionState::Ended => self.select(self.current.unwrap_or(fallback)),
            SessionState::Playing => {
                self.state = SessionState::Paused;
                vec![Effect::TogglePause]
            }
            SessionState::Paused => {
                self.state = SessionState::Playing;
                vec![Effect::TogglePause]
            }
        }
    }

    /// Manual skip forward. Wraps only in `LoopAll`.
    pub fn next(&mut self) -> Vec<Effect> {
        if self.track_count == 0 {
            return Vec::new();
        }
        match self.current {
            None => self.select(0),
            Some(i) if i + 1 < self.track_count => self.select(i + 1),
            Some(_) if self.loop_mode == LoopMode::LoopAll => self.select(0),
            Some(_) => Vec::new(),
        }
    }

    /// Manual skip back. Wraps only in `LoopAll`.
    pub fn prev(&mut self) -> Vec<Effect> {
        if self.track_count == 0 {
            return Vec::new();
        }
        match self.current {
            None => self.select(0),
            Some(i) if i > 0 => self.select(i - 1),
            Some(_) if self.loop_mode == LoopMode::LoopAll => self.select(self.track_count - 1),
            Some(_) => Vec::new(),
        }
    }

    /// Scrub. The position is updated right away so the lyrics follow before
    /// the driver confirms.
    pub fn seek_by(&mut self, secs: i32) -> Vec<Effect> {
        if !matches!(self.state, SessionState::Playing | SessionState::Paused) {
            return Vec::new();
        }
        self.position = (self.position + f64::from(secs)).max(0.0);
        vec![Effect::SeekBy(secs)]
    }

    /// Unload the current track.
    pub fn stop(&mut self) -> Vec<Effect> {
        let was_loaded = self.current.is_some();
        self.current = None;
        self.position = 0.0;
        self.state = SessionState::Idle;
        // Invalidate in-flight driver events.
        self.token = self.token.wrapping_add(1);
        if was_loaded {
            vec![Effect::Stop]
        } else {
            Vec::new()
        }
    }
}
