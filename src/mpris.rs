//! MPRIS service on the D-Bus session bus.
//!
//! Desktop media keys and tools like `playerctl` talk to the player through
//! `org.mpris.MediaPlayer2`. Incoming calls are forwarded as `ControlCmd`s to
//! the event loop; the loop publishes what is playing through `MprisHandle`.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface, object_server::InterfaceRef};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::catalog::Album;
use crate::session::SessionState;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.lyricdeck";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: SessionState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<ObjectPath<'static>>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    /// Wakes the service thread to emit `PropertiesChanged`.
    notify: Sender<()>,
}

fn file_url(path: &std::path::Path) -> String {
    format!("file://{}", path.display())
}

impl MprisHandle {
    pub fn set_playback(&self, playback: SessionState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish track `index` of `album` as the current track. `None` for either
    /// clears the metadata.
    pub fn set_track_metadata(&self, album: Option<&Album>, index: Option<usize>) {
        let track = album.zip(index).and_then(|(a, i)| Some((a, i, a.tracks.get(i)?)));

        if let Ok(mut s) = self.state.lock() {
            match track {
                Some((album, index, track)) => {
                    s.title = Some(track.title.clone());
                    s.artist = album.artist.iter().cloned().collect();
                    s.album = Some(album.title.clone());
                    s.url = Some(file_url(&track.audio));
                    s.art_url = album.cover.as_deref().map(file_url);
                    s.length_micros = track
                        .duration
                        .and_then(|d| i64::try_from(d.as_micros()).ok());
                    s.track_id = ObjectPath::try_from(format!("{OBJECT_PATH}/track/{index}")).ok();
                }
                None => {
                    s.title = None;
                    s.artist.clear();
                    s.album = None;
                    s.url = None;
                    s.art_url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "lyricdeck"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

fn owned<'a>(v: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(v.into()).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            SessionState::Idle | SessionState::Ended => "Stopped",
            SessionState::Playing => "Playing",
            SessionState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };
        put("mpris:trackid", s.track_id.clone().and_then(owned));
        put("xesam:title", s.title.clone().and_then(owned));
        if !s.artist.is_empty() {
            put("xesam:artist", owned(s.artist.clone()));
        }
        put("xesam:album", s.album.clone().and_then(owned));
        put("xesam:url", s.url.clone().and_then(owned));
        put("mpris:artUrl", s.art_url.clone().and_then(owned));
        put("mpris:length", s.length_micros.and_then(owned));
        map
    }
}

/// Emit `PropertiesChanged` for the player properties the event loop updates.
async fn emit_changes(iface: &InterfaceRef<PlayerIface>) {
    let player = iface.get().await;
    let emitter = iface.signal_emitter();
    if let Err(e) = player.playback_status_changed(emitter).await {
        debug!(error = %e, "MPRIS: failed to signal PlaybackStatus");
    }
    if let Err(e) = player.metadata_changed(emitter).await {
        debug!(error = %e, "MPRIS: failed to signal Metadata");
    }
}

async fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify_rx: Receiver<()>) {
    let connection = match Connection::session().await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "MPRIS: failed to connect to session bus");
            return;
        }
    };

    if let Err(e) = connection.request_name(BUS_NAME).await {
        warn!(error = %e, "MPRIS: failed to acquire name");
        return;
    }

    let object_server = connection.object_server();

    if let Err(e) = object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await
    {
        warn!(error = %e, "MPRIS: failed to register root iface");
        return;
    }

    if let Err(e) = object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await
    {
        warn!(error = %e, "MPRIS: failed to register player iface");
        return;
    }

    let iface = match object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await
    {
        Ok(iface) => iface,
        Err(e) => {
            warn!(error = %e, "MPRIS: player iface not found after registration");
            return;
        }
    };
    debug!(name = BUS_NAME, "MPRIS service registered");

    // Coalesce notifications and emit at most a few signals per second.
    loop {
        Timer::after(Duration::from_millis(250)).await;
        let mut changed = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => changed = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if changed {
            emit_changes(&iface).await;
        }
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel();

    let state_for_thread = state.clone();
    std::thread::spawn(move || block_on(serve(tx, state_for_thread, notify_rx)));

    MprisHandle { state, notify }
}

#[cfg(test)]
mod tests;
