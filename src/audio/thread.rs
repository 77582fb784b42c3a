use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, info, warn};

use crate::config::AudioSettings;

use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioError, DriverEvent, PlayToken, seek_target};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<DriverEvent>,
    audio_settings: AudioSettings,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
                // but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "No audio output device; playback disabled");
                None
            }
        };

        let mut driver = Driver::new(stream, events, audio_settings);

        let mut last_tick = Instant::now();
        loop {
            let timeout = tick.saturating_sub(last_tick.elapsed());
            match rx.recv_timeout(timeout) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    driver.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => driver.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= tick {
                driver.tick();
                last_tick = Instant::now();
            }
        }
        debug!("Audio thread exiting");
    })
}

/// State owned by the audio thread.
struct Driver {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    token: Option<PlayToken>,
    path: Option<PathBuf>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    events: Sender<DriverEvent>,
    settings: AudioSettings,
}

impl Driver {
    fn new(stream: Option<OutputStream>, events: Sender<DriverEvent>, settings: AudioSettings) -> Self {
        Self {
            stream,
            sink: None,
            token: None,
            path: None,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
            events,
            settings,
        }
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Play { token, path } => self.play(token, path),
            AudioCmd::Stop => self.stop(),
            AudioCmd::TogglePause => self.toggle_pause(),
            AudioCmd::SeekBy(secs) => self.seek_by(secs),
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    fn emit(&self, event: DriverEvent) {
        // The receiver only goes away during shutdown.
        let _ = self.events.send(event);
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn open(&self, path: &std::path::Path, start_at: Duration) -> Result<Sink, AudioError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| AudioError::NoOutput("output stream unavailable".to_string()))?;
        create_sink_at(stream, path, start_at)
    }

    fn play(&mut self, token: PlayToken, path: PathBuf) {
        match self.open(&path, Duration::ZERO) {
            Ok(sink) => self.start(token, path, sink),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot play track");
                self.stop_sink();
                self.emit(DriverEvent::Failed {
                    token,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Swap `new_sink` in as the current track, crossfading from the old one
    /// when something is playing.
    fn start(&mut self, token: PlayToken, path: PathBuf, new_sink: Sink) {
        // Keep the default volume sane even if crossfade is disabled.
        new_sink.set_volume(1.0);

        let crossfade_ms = self.settings.crossfade_ms;
        let crossfade_steps = self.settings.crossfade_steps.max(1);

        // The new track is audible from the first step of the fade, so its
        // clock starts there.
        let mut started_at = None;
        if let Some(old_sink) = self.sink.take() {
            if !self.paused && crossfade_ms > 0 {
                old_sink.set_volume(1.0);
                new_sink.set_volume(0.0);
                new_sink.play();
                started_at = Some(Instant::now());

                // Fade volumes in a short blocking loop. Audio continues in rodio's
                // mixer thread meanwhile.
                for step in 1..=crossfade_steps {
                    let t = (step as f32) / (crossfade_steps as f32);
                    old_sink.set_volume(1.0 - t);
                    new_sink.set_volume(t);
                    thread::sleep(Duration::from_millis((crossfade_ms / crossfade_steps).max(1)));
                }
            }
            old_sink.stop();
        }

        new_sink.play();
        info!(path = %path.display(), token, "Playing");

        self.sink = Some(new_sink);
        self.token = Some(token);
        self.path = Some(path);
        self.paused = false;
        self.started_at = Some(started_at.unwrap_or_else(Instant::now));
        self.accumulated = Duration::ZERO;

        self.emit(DriverEvent::TimeUpdate {
            token,
            position: self.elapsed(),
        });
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.token = None;
        self.path = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn stop(&mut self) {
        debug!(token = ?self.token, "Stopping playback");
        self.stop_sink();
    }

    fn toggle_pause(&mut self) {
        let (Some(sink), Some(token)) = (self.sink.as_ref(), self.token) else {
            return;
        };

        if self.paused {
            sink.play();
            self.started_at = Some(Instant::now());
            self.paused = false;
            self.emit(DriverEvent::Resumed { token });
        } else {
            sink.pause();
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
            self.emit(DriverEvent::Paused { token });
        }
    }

    /// Scrubbing: rebuild the current sink and skip into the file.
    fn seek_by(&mut self, secs: i32) {
        let (Some(token), Some(path)) = (self.token, self.path.clone()) else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        let target = seek_target(self.elapsed(), secs);
        let new_sink = match self.open(&path, target) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Seek failed");
                return;
            }
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(new_sink);
        self.accumulated = target;

        self.emit(DriverEvent::TimeUpdate {
            token,
            position: target,
        });
    }

    /// Periodic work: publish the position and notice when the track ran out.
    fn tick(&mut self) {
        let Some(token) = self.token else {
            return;
        };
        if self.paused {
            return;
        }

        let finished = self.sink.as_ref().is_some_and(|s| s.empty());
        if finished {
            info!(token, "Track finished");
            self.stop_sink();
            self.emit(DriverEvent::Ended { token });
            return;
        }

        self.emit(DriverEvent::TimeUpdate {
            token,
            position: self.elapsed(),
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(ref s) = self.sink {
            // Fade out gently before stopping.
            fade_out_sink(s, fade_out_ms);
            s.stop();
        }
        self.sink = None;
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

#[cfg(test)]
mod tests;
