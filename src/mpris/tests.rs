use super::*;
use crate::catalog::{Album, Track};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

fn make_album() -> Album {
    Album {
        id: "night-drive".to_string(),
        title: "Night Drive".to_string(),
        year: 2020,
        artist: Some("Test Artist".to_string()),
        cover: Some(PathBuf::from("/tmp/music/cover.jpg")),
        dir: PathBuf::from("/tmp/music"),
        tracks: vec![Track {
            id: "t1".to_string(),
            track_number: 1,
            title: "Test Title".to_string(),
            audio: PathBuf::from("/tmp/music/test.mp3"),
            lyrics: None,
            timed_lyrics: None,
            credits: None,
            duration: Some(Duration::from_micros(1_234_567)),
        }],
    }
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify,
    };
    (handle, state, notify_rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state, notify_rx) = handle();
    let album = make_album();
    handle.set_track_metadata(Some(&album), Some(0));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Night Drive"));
        assert_eq!(s.url.as_deref(), Some("file:///tmp/music/test.mp3"));
        assert_eq!(s.art_url.as_deref(), Some("file:///tmp/music/cover.jpg"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/0")
        );
    }
    assert!(notify_rx.try_recv().is_ok());

    handle.set_track_metadata(Some(&album), None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn out_of_range_track_clears_metadata() {
    let (handle, state, _rx) = handle();
    let album = make_album();
    handle.set_track_metadata(Some(&album), Some(0));
    handle.set_track_metadata(Some(&album), Some(5));
    assert_eq!(state.lock().unwrap().title, None);
}

#[test]
fn playback_status_maps_session_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    for (session, expected) in [
        (SessionState::Idle, "Stopped"),
        (SessionState::Playing, "Playing"),
        (SessionState::Paused, "Paused"),
        (SessionState::Ended, "Stopped"),
    ] {
        state.lock().unwrap().playback = session;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn player_methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    assert_eq!(
        rx.try_iter().collect::<Vec<_>>(),
        vec![ControlCmd::PlayPause, ControlCmd::Next, ControlCmd::Prev]
    );
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state, _rx) = handle();
    handle.set_track_metadata(Some(&make_album()), Some(0));

    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_a_track() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };
    assert!(iface.metadata().is_empty());
}
