//! Application model types: `App`, `View` and `Tab`.
//!
//! The `App` struct holds the gallery, the open album, the playback session
//! and the UI flags used by the renderer and the runtime.

use tracing::debug;

use crate::audio::DriverEvent;
use crate::catalog::{Album, Track};
use crate::config::{TabSetting, UiSettings};
use crate::session::{Effect, PlaybackSession, SessionState};

use super::panel::LyricsPanel;

/// Top-level screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Gallery,
    Album,
}

/// Panels under the now-playing line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tab {
    Lyrics,
    Credits,
}

impl Tab {
    pub fn from_setting(s: TabSetting) -> Option<Self> {
        match s {
            TabSetting::Lyrics => Some(Self::Lyrics),
            TabSetting::Credits => Some(Self::Credits),
            TabSetting::None => None,
        }
    }
}

/// The main application model.
pub struct App {
    pub albums: Vec<Album>,
    /// Selected album in the gallery (index into `albums`).
    pub selected: usize,
    pub view: View,
    pub open_album: Option<usize>,
    /// Highlighted row in the open album's track list.
    pub track_cursor: usize,
    pub session: PlaybackSession,

    pub active_tab: Option<Tab>,
    pub default_tab: Option<Tab>,
    pub lyrics: LyricsPanel,

    /// Start the first track when an album is opened.
    pub autoplay: bool,
    pub filter_mode: bool,
    pub filter_query: String,
    /// Last user-facing error or notice.
    pub status: Option<String>,
    pub library_root: Option<String>,
}

impl App {
    /// Create a new `App` over `albums`, already sorted for display.
    pub fn new(albums: Vec<Album>, session: PlaybackSession) -> Self {
        Self {
            albums,
            selected: 0,
            view: View::Gallery,
            open_album: None,
            track_cursor: 0,
            session,

            active_tab: Some(Tab::Lyrics),
            default_tab: Some(Tab::Lyrics),
            lyrics: LyricsPanel::default(),

            autoplay: true,
            filter_mode: false,
            filter_query: String::new(),
            status: None,
            library_root: None,
        }
    }

    /// Set the tab each newly opened album starts with.
    pub fn set_default_tab(&mut self, tab: Option<Tab>) {
        self.default_tab = tab;
        self.active_tab = tab;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Line shown under the status bar: a playback failure of the loaded
    /// track wins over other notices.
    pub fn status_message(&self) -> Option<String> {
        match self.session.last_error() {
            Some(err) => Some(format!("Playback failed: {err}")),
            None => self.status.clone(),
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn has_albums(&self) -> bool {
        !self.albums.is_empty()
    }

    pub fn current_album(&self) -> Option<&Album> {
        self.open_album.and_then(|i| self.albums.get(i))
    }

    /// Track loaded in the session, if any.
    pub fn playing_track(&self) -> Option<&Track> {
        let album = self.current_album()?;
        self.session.current().and_then(|i| album.tracks.get(i))
    }

    /// Index of the track whose lyrics and credits are shown: the loaded
    /// track, or the one under the cursor while nothing is loaded.
    pub fn shown_track_index(&self) -> Option<usize> {
        let album = self.current_album()?;
        let idx = self.session.current().unwrap_or(self.track_cursor);
        (idx < album.tracks.len()).then_some(idx)
    }

    pub fn shown_track(&self) -> Option<&Track> {
        let album = self.current_album()?;
        self.shown_track_index().and_then(|i| album.tracks.get(i))
    }

    /// Active lyric line of the shown track, derived from the session position.
    pub fn active_line(&self) -> Option<usize> {
        let track = self.shown_track()?;
        if self.session.current() != self.shown_track_index() {
            return None;
        }
        self.session.active_line(track.lines())
    }

    /// Return the gallery order of album indices, taking the filter into account.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        (0..self.albums.len())
            .filter(|&i| {
                query.is_empty()
                    || Self::fuzzy_match_positions(&self.albums[i].display(), query).is_some()
            })
            .collect()
    }

    /// Fuzzy/subsequence match: return the character positions in `title`
    /// that match `query`, or `None` if not matched.
    pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
        if query.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title.chars().enumerate();

        for qc in query.chars() {
            let qc_low = qc.to_lowercase().next().unwrap_or(qc);
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc.to_lowercase().next().unwrap_or(tc) == qc_low => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    /// Enter filter mode.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }
    /// Leave filter mode, keeping the query.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }
    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }
    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the filtered gallery, otherwise
    /// move selection to the first visible album.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        match display.first() {
            None => self.selected = 0,
            Some(&first) if !display.contains(&self.selected) => self.selected = first,
            Some(_) => {}
        }
    }

    /// Move the cursor down: gallery selection or track cursor, wrapping.
    pub fn next(&mut self) {
        match self.view {
            View::Gallery => {
                let display = self.display_indices();
                if display.is_empty() {
                    return;
                }
                let pos = display.iter().position(|&i| i == self.selected);
                self.selected = match pos {
                    Some(p) => display[(p + 1) % display.len()],
                    None => display[0],
                };
            }
            View::Album => {
                let len = self.current_album().map_or(0, |a| a.tracks.len());
                if len > 0 {
                    self.track_cursor = (self.track_cursor + 1) % len;
                }
            }
        }
    }

    /// Move the cursor up: gallery selection or track cursor, wrapping.
    pub fn prev(&mut self) {
        match self.view {
            View::Gallery => {
                let display = self.display_indices();
                if display.is_empty() {
                    return;
                }
                let pos = display.iter().position(|&i| i == self.selected);
                self.selected = match pos {
                    Some(0) | None => display[display.len() - 1],
                    Some(p) => display[p - 1],
                };
            }
            View::Album => {
                let len = self.current_album().map_or(0, |a| a.tracks.len());
                if len > 0 {
                    self.track_cursor = (self.track_cursor + len - 1) % len;
                }
            }
        }
    }

    /// Jump to the first entry of the current list.
    pub fn first(&mut self) {
        match self.view {
            View::Gallery => {
                if let Some(&first) = self.display_indices().first() {
                    self.selected = first;
                }
            }
            View::Album => self.track_cursor = 0,
        }
    }

    /// Jump to the last entry of the current list.
    pub fn last(&mut self) {
        match self.view {
            View::Gallery => {
                if let Some(&last) = self.display_indices().last() {
                    self.selected = last;
                }
            }
            View::Album => {
                let len = self.current_album().map_or(0, |a| a.tracks.len());
                self.track_cursor = len.saturating_sub(1);
            }
        }
    }

    /// Open the selected album. Starts its first track when `autoplay` is set.
    pub fn open_selected(&mut self) -> Vec<Effect> {
        if !self.display_indices().contains(&self.selected) {
            return Vec::new();
        }
        let Some(album) = self.albums.get(self.selected) else {
            return Vec::new();
        };
        let track_count = album.tracks.len();

        self.view = View::Album;
        self.open_album = Some(self.selected);
        self.track_cursor = 0;
        self.active_tab = self.default_tab;
        self.lyrics.reset();

        let mut effects = self.session.load_album(track_count);
        if track_count == 0 {
            self.set_status("This album has no tracks");
        } else if self.autoplay {
            effects.extend(self.session.select(0));
        }
        effects
    }

    /// Back to the gallery. Playback stops with the album view.
    pub fn close_album(&mut self) -> Vec<Effect> {
        self.view = View::Gallery;
        self.open_album = None;
        self.track_cursor = 0;
        self.lyrics.reset();
        let effects = self.session.stop();
        self.session.load_album(0);
        effects
    }

    /// Play the track under the cursor. Resumes instead when it is the
    /// loaded track.
    pub fn play_cursor(&mut self) -> Vec<Effect> {
        if self.view != View::Album {
            return Vec::new();
        }
        self.clear_status();
        let loaded = matches!(
            self.session.state(),
            SessionState::Playing | SessionState::Paused
        );
        if loaded && self.session.current() == Some(self.track_cursor) {
            return self.play();
        }
        self.session.select(self.track_cursor)
    }

    /// Keep the track cursor on the track the session just started.
    fn follow(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        if let Some(Effect::Play { index, .. }) = effects.first() {
            self.track_cursor = *index;
        }
        effects
    }

    /// Play/pause; from a stopped session this plays the track under the cursor.
    pub fn play_pause(&mut self) -> Vec<Effect> {
        let effects = self.session.toggle_pause(self.track_cursor);
        self.follow(effects)
    }

    pub fn play(&mut self) -> Vec<Effect> {
        if self.session.state() == SessionState::Playing {
            return Vec::new();
        }
        self.play_pause()
    }

    pub fn pause(&mut self) -> Vec<Effect> {
        if self.session.state() != SessionState::Playing {
            return Vec::new();
        }
        self.play_pause()
    }

    pub fn next_track(&mut self) -> Vec<Effect> {
        let effects = self.session.next();
        self.follow(effects)
    }

    pub fn prev_track(&mut self) -> Vec<Effect> {
        let effects = self.session.prev();
        self.follow(effects)
    }

    pub fn stop_playback(&mut self) -> Vec<Effect> {
        self.session.stop()
    }

    pub fn seek_by(&mut self, secs: i32) -> Vec<Effect> {
        self.session.seek_by(secs)
    }

    pub fn cycle_loop_mode(&mut self) {
        self.session.loop_mode = self.session.loop_mode.cycled();
    }

    /// Toggle a tab the way the tab buttons do: pressing the open tab closes it.
    pub fn toggle_tab(&mut self, tab: Tab) {
        self.active_tab = if self.active_tab == Some(tab) {
            None
        } else {
            Some(tab)
        };
        if self.active_tab == Some(Tab::Lyrics) {
            self.lyrics.recenter();
        }
    }

    /// Whether `tab` has anything to show for the shown track.
    pub fn tab_available(&self, tab: Tab) -> bool {
        self.shown_track().is_some_and(|t| match tab {
            Tab::Lyrics => t.has_lyrics(),
            Tab::Credits => t.has_credits(),
        })
    }

    /// Feed a driver signal to the session. The track cursor follows playback
    /// when the session moves to another track.
    pub fn handle_driver_event(&mut self, event: DriverEvent) -> Vec<Effect> {
        if event.token() != self.session.token() {
            debug!(?event, live = self.session.token(), "Dropping stale driver event");
            return Vec::new();
        }
        let effects = match event {
            DriverEvent::TimeUpdate { token, position } => {
                self.session.on_time_update(token, position);
                Vec::new()
            }
            DriverEvent::Paused { token } => {
                self.session.on_paused(token);
                Vec::new()
            }
            DriverEvent::Resumed { token } => {
                self.session.on_resumed(token);
                Vec::new()
            }
            DriverEvent::Ended { token } => self.session.on_ended(token),
            DriverEvent::Failed { token, message } => {
                self.session.on_failed(token, message);
                Vec::new()
            }
        };

        self.follow(effects)
    }

    /// Update the lyrics panel for this frame. `area` is the panel's inner
    /// size, or `None` when the panel is not on screen.
    pub fn sync_lyrics(&mut self, area: Option<(u16, u16)>, ui: &UiSettings) {
        let key = self.open_album.zip(self.shown_track_index());
        let active = self.active_line();
        let albums = &self.albums;
        let track = key.and_then(|(a, t)| albums.get(a)?.tracks.get(t));

        let lines: Vec<&str> = match track {
            Some(t) if !t.lines().is_empty() => t.lines().iter().map(|l| l.line.as_str()).collect(),
            Some(t) => t.lyrics.as_deref().map(|l| l.lines().collect()).unwrap_or_default(),
            None => Vec::new(),
        };

        self.lyrics.sync(key, area, || lines, active, ui);
    }
}
