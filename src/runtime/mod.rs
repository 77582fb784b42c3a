//! Process wiring: settings, logging, library scan, audio thread, MPRIS and
//! the terminal.

use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::audio::AudioPlayer;
use crate::catalog::scan;
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

/// Library root: first command-line argument, then `library.root`, then the
/// current directory.
fn library_root(arg: Option<PathBuf>, configured: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match arg.or(configured) {
        Some(p) => Ok(p),
        None => env::current_dir().context("cannot determine the current directory"),
    }
}

/// Best-effort undo of raw mode and the alternate screen.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
}

/// Run `restore` when terminal setup fails part way, then pass the result on.
fn or_restore<T, E>(result: Result<T, E>, restore: impl FnOnce()) -> Result<T, E> {
    if result.is_err() {
        restore();
    }
    result
}

pub fn run() -> anyhow::Result<()> {
    let (settings, config_warning) = settings::load_settings();
    let log_path = logging::init(&settings.logging);
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }
    info!(log = ?log_path, "Starting lyricdeck");

    let root = library_root(env::args_os().nth(1).map(PathBuf::from), settings.library.root.clone())?;
    if !root.is_dir() {
        anyhow::bail!("library root {} is not a directory", root.display());
    }
    info!(root = %root.display(), "Scanning library");

    let found = scan(&root, &settings.library);
    let mut app = startup::build_app(found, &root, &settings);

    let (audio_player, driver_rx) = AudioPlayer::new(
        settings.audio.clone(),
        Duration::from_millis(settings.playback.tick_ms),
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    or_restore(execute!(stdout, EnterAlternateScreen), restore_terminal)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = or_restore(Terminal::new(backend), restore_terminal)?;

    let channels = event_loop::Channels {
        audio: &audio_player,
        driver_rx: &driver_rx,
        mpris: &mpris,
        control_tx: &control_tx,
        control_rx: &control_rx,
    };
    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &channels, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

#[cfg(test)]
mod tests;
