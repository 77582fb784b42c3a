use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/lyricdeck/config.toml` or `~/.config/lyricdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `LYRICDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Crossfade duration when switching tracks (milliseconds).
    /// Set to 0 to disable crossfade.
    pub crossfade_ms: u64,
    /// Number of steps used to fade volumes (higher = smoother, more CPU).
    pub crossfade_steps: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            crossfade_ms: 0,
            crossfade_steps: 10,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which tab is open when a track is shown.
    pub default_tab: TabSetting,

    /// Animate lyric scrolling instead of jumping.
    pub smooth_scroll: bool,

    /// Fraction of the remaining distance the lyrics panel scrolls per frame
    /// (0 < easing <= 1). Only used with `smooth_scroll`.
    pub scroll_easing: f32,

    /// Which time fields to show for the now-playing line, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ art & story ~ ".to_string(),
            default_tab: TabSetting::Lyrics,
            smooth_scroll: true,
            scroll_easing: 0.35,
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Start the first track when an album is opened.
    pub autoplay: bool,
    /// Move on to the next track when one finishes.
    pub auto_advance: bool,
    /// Default loop mode.
    pub loop_mode: LoopModeSetting,
    /// How often the audio thread reports the playback position (milliseconds).
    pub tick_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            auto_advance: true,
            loop_mode: LoopModeSetting::NoLoop,
            tick_ms: 100,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopModeSetting {
    #[serde(alias = "no_loop", alias = "no-loop", alias = "off")]
    NoLoop,
    #[serde(
        alias = "loopall",
        alias = "loop_all",
        alias = "loop-all",
        alias = "repeat-album"
    )]
    LoopAll,
    #[serde(
        alias = "loopone",
        alias = "loop_one",
        alias = "loop-one",
        alias = "repeat-one"
    )]
    LoopOne,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabSetting {
    Lyrics,
    Credits,
    #[serde(alias = "closed")]
    None,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Library root. The first command-line argument wins over this.
    pub root: Option<PathBuf>,
    /// File names recognised as album manifests (case-insensitive).
    pub manifest_names: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Look for `<audio stem>.lrc` when a track has no timed lyrics.
    pub lrc_sidecars: bool,
    /// Read track lengths from the audio file headers.
    pub read_durations: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            manifest_names: vec!["album.toml".into(), "album.json".into()],
            follow_links: true,
            include_hidden: false,
            max_depth: None,
            lrc_sidecars: true,
            read_durations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. "info" or "lyricdeck=debug".
    /// `LYRICDECK_LOG` overrides it.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/lyricdeck/lyricdeck.log`.
    pub file: Option<PathBuf>,
    /// Set to false to disable logging entirely.
    pub enabled: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            enabled: true,
        }
    }
}
