use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info, warn};

use crate::app::{App, Tab, View};
use crate::audio::{AudioCmd, AudioPlayer, DriverEvent};
use crate::catalog::Album;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, snapshot, update_mpris};
use crate::session::Effect;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last state published over MPRIS.
    pub last_mpris: Option<MprisSnapshot>,
}

/// Everything the loop talks to besides the app itself.
pub struct Channels<'a> {
    pub audio: &'a AudioPlayer,
    pub driver_rx: &'a mpsc::Receiver<DriverEvent>,
    pub mpris: &'a MprisHandle,
    pub control_tx: &'a mpsc::Sender<ControlCmd>,
    pub control_rx: &'a mpsc::Receiver<ControlCmd>,
}

/// Translate a session effect into a command for the audio thread.
pub fn audio_cmd(effect: &Effect, album: Option<&Album>) -> Option<AudioCmd> {
    match *effect {
        Effect::Play { index, token } => {
            let track = album.and_then(|a| a.tracks.get(index))?;
            Some(AudioCmd::Play {
                token,
                path: track.audio.clone(),
            })
        }
        Effect::TogglePause => Some(AudioCmd::TogglePause),
        Effect::SeekBy(secs) => Some(AudioCmd::SeekBy(secs)),
        Effect::Stop => Some(AudioCmd::Stop),
    }
}

fn apply_effects(effects: Vec<Effect>, app: &App, audio: &AudioPlayer) {
    for effect in effects {
        let Some(cmd) = audio_cmd(&effect, app.current_album()) else {
            warn!(?effect, "Effect refers to a track that is not loaded");
            continue;
        };
        debug!(?cmd, "Sending audio command");
        if let Err(e) = audio.send(cmd) {
            warn!(error = %e, "Audio thread is gone");
        }
    }
}

fn scrub_seconds(settings: &config::Settings) -> i32 {
    settings.controls.scrub_seconds.min(i32::MAX as u64) as i32
}

fn quit(settings: &config::Settings, audio: &AudioPlayer) {
    info!("Shutting down");
    audio.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

/// Main terminal event loop: handles input, driver signals, UI drawing and
/// MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    ch: &Channels<'_>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        // Driver signals first so the frame shows the latest position.
        while let Ok(ev) = ch.driver_rx.try_recv() {
            let effects = app.handle_driver_event(ev);
            apply_effects(effects, app, ch.audio);
        }

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let snap = snapshot(app);
        if state.last_mpris != Some(snap) {
            update_mpris(ch.mpris, app);
            state.last_mpris = Some(snap);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = ch.control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, ch.audio) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, ch, state) {
                        break;
                    }
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "Terminal resized");
                    app.lyrics.recenter();
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Apply a transport command from MPRIS or the keyboard. Returns true on quit.
fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio: &AudioPlayer,
) -> bool {
    debug!(?cmd, "Control command");
    let effects = match cmd {
        ControlCmd::Quit => {
            quit(settings, audio);
            return true;
        }
        ControlCmd::Play => app.play(),
        ControlCmd::Pause => app.pause(),
        ControlCmd::PlayPause => app.play_pause(),
        ControlCmd::Stop => app.stop_playback(),
        ControlCmd::Next => app.next_track(),
        ControlCmd::Prev => app.prev_track(),
    };
    apply_effects(effects, app, audio);
    false
}

fn handle_filter_key(key: KeyEvent, app: &mut App, audio: &AudioPlayer) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('j') | KeyCode::Char('n') if ctrl => app.next(),
        KeyCode::Char('k') | KeyCode::Char('p') if ctrl => app.prev(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_filter_char(c);
            }
        }
        KeyCode::Enter => {
            if app.display_indices().is_empty() {
                return;
            }
            app.exit_filter_mode();
            let effects = app.open_selected();
            apply_effects(effects, app, audio);
        }
        _ => {}
    }
}

/// Returns true when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    ch: &Channels<'_>,
    state: &mut EventLoopState,
) -> bool {
    if app.filter_mode {
        state.pending_gg = false;
        handle_filter_key(key, app, ch.audio);
        return false;
    }

    let was_gg = std::mem::take(&mut state.pending_gg);
    match key.code {
        KeyCode::Char('q') => {
            quit(settings, ch.audio);
            return true;
        }
        KeyCode::Char('/') if app.view == View::Gallery => app.enter_filter_mode(),
        KeyCode::Char('r') => app.cycle_loop_mode(),
        KeyCode::Char('g') => {
            if was_gg {
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            let effects = match app.view {
                View::Gallery => app.open_selected(),
                View::Album => app.play_cursor(),
            };
            apply_effects(effects, app, ch.audio);
        }
        KeyCode::Esc | KeyCode::Backspace => match app.view {
            View::Album => {
                let effects = app.close_album();
                apply_effects(effects, app, ch.audio);
            }
            View::Gallery => app.clear_filter(),
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = ch.control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = ch.control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = ch.control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            let effects = app.seek_by(scrub_seconds(settings));
            apply_effects(effects, app, ch.audio);
        }
        KeyCode::Char('H') => {
            let effects = app.seek_by(-scrub_seconds(settings));
            apply_effects(effects, app, ch.audio);
        }
        KeyCode::Char('t') if app.view == View::Album => app.toggle_tab(Tab::Lyrics),
        KeyCode::Char('c') if app.view == View::Album => app.toggle_tab(Tab::Credits),
        _ => {}
    }

    false
}
