use super::*;
use crate::lyrics::LyricLine;
use std::time::Duration;

fn session(tracks: usize) -> PlaybackSession {
    let mut s = PlaybackSession::new(LoopMode::NoLoop, true);
    s.load_album(tracks);
    s
}

fn played(effects: &[Effect]) -> Option<(usize, u64)> {
    effects.iter().find_map(|e| match e {
        Effect::Play { index, token } => Some((*index, *token)),
        _ => None,
    })
}

#[test]
fn starts_idle_without_a_track() {
    let s = session(3);
    assert_eq!(s.state(), SessionState::Idle);
    assert_eq!(s.current(), None);
    assert_eq!(s.active_line(&[LyricLine::new(0.0, "a")]), None);
}

#[test]
fn select_resets_position_and_plays() {
    let mut s = session(3);
    let (_, token) = played(&s.select(1)).unwrap();
    assert!(s.on_time_update(token, Duration::from_secs(42)));
    assert_eq!(s.position(), 42.0);

    let effects = s.select(2);
    assert_eq!(played(&effects).map(|(i, _)| i), Some(2));
    assert_eq!(s.position(), 0.0);
    assert_eq!(s.state(), SessionState::Playing);
    assert_eq!(s.current(), Some(2));
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut s = session(2);
    assert!(s.select(2).is_empty());
    assert_eq!(s.state(), SessionState::Idle);
}

#[test]
fn stale_time_updates_are_dropped() {
    let mut s = session(3);
    let (_, first) = played(&s.select(0)).unwrap();
    let (_, second) = played(&s.select(1)).unwrap();
    assert_ne!(first, second);

    assert!(!s.on_time_update(first, Duration::from_secs(99)));
    assert_eq!(s.position(), 0.0);
    assert!(s.on_time_update(second, Duration::from_secs(3)));
    assert_eq!(s.position(), 3.0);
}

#[test]
fn active_line_is_derived_from_position() {
    let lines = vec![
        LyricLine::new(0.0, "A"),
        LyricLine::new(5.0, "B"),
        LyricLine::new(10.0, "C"),
    ];
    let mut s = session(1);
    let (_, token) = played(&s.select(0)).unwrap();
    assert_eq!(s.active_line(&lines), Some(0));

    s.on_time_update(token, Duration::from_millis(5_000));
    assert_eq!(s.active_line(&lines), Some(1));

    s.on_time_update(token, Duration::from_millis(9_990));
    assert_eq!(s.active_line(&lines), Some(1));

    s.on_time_update(token, Duration::from_secs(100));
    assert_eq!(s.active_line(&lines), Some(2));
}

#[test]
fn ended_advances_to_next_track() {
    let mut s = session(3);
    let (_, token) = played(&s.select(0)).unwrap();
    s.on_time_update(token, Duration::from_secs(180));

    let effects = s.on_ended(token);
    assert_eq!(played(&effects).map(|(i, _)| i), Some(1));
    assert_eq!(s.current(), Some(1));
    assert_eq!(s.position(), 0.0);
    assert_eq!(s.state(), SessionState::Playing);
}

#[test]
fn ended_on_last_track_stays_ended() {
    let mut s = session(2);
    let (_, token) = played(&s.select(1)).unwrap();
    assert!(s.on_ended(token).is_empty());
    assert_eq!(s.state(), SessionState::Ended);
    assert_eq!(s.current(), Some(1));

    // Late time updates for the finished track change nothing.
    assert!(!s.on_time_update(token, Duration::from_secs(1)));
}

#[test]
fn ended_respects_loop_modes_and_auto_advance() {
    let mut s = session(2);
    s.loop_mode = LoopMode::LoopAll;
    let (_, token) = played(&s.select(1)).unwrap();
    assert_eq!(played(&s.on_ended(token)).map(|(i, _)| i), Some(0));

    s.loop_mode = LoopMode::LoopOne;
    let token = s.token();
    assert_eq!(played(&s.on_ended(token)).map(|(i, _)| i), Some(0));

    s.auto_advance = false;
    let token = s.token();
    assert!(s.on_ended(token).is_empty());
    assert_eq!(s.state(), SessionState::Ended);
}

#[test]
fn stale_ended_signal_does_not_advance() {
    let mut s = session(3);
    let (_, old) = played(&s.select(0)).unwrap();
    s.select(2);
    assert!(s.on_ended(old).is_empty());
    assert_eq!(s.current(), Some(2));
    assert_eq!(s.state(), SessionState::Playing);
}

#[test]
fn toggle_pause_walks_the_states() {
    let mut s = session(2);
    // From idle, play the fallback track.
    assert_eq!(played(&s.toggle_pause(1)).map(|(i, _)| i), Some(1));
    assert_eq!(s.toggle_pause(0), vec![Effect::TogglePause]);
    assert_eq!(s.state(), SessionState::Paused);
    assert_eq!(s.toggle_pause(0), vec![Effect::TogglePause]);
    assert_eq!(s.state(), SessionState::Playing);

    // From ended, restart the current track.
    let token = s.token();
    s.on_ended(token);
    assert_eq!(s.state(), SessionState::Ended);
    assert_eq!(played(&s.toggle_pause(0)).map(|(i, _)| i), Some(1));
}

#[test]
fn driver_pause_and_resume_signals_update_state() {
    let mut s = session(1);
    let (_, token) = played(&s.select(0)).unwrap();
    s.on_paused(token);
    assert_eq!(s.state(), SessionState::Paused);
    // Time updates keep flowing while paused (e.g. after a seek).
    assert!(s.on_time_update(token, Duration::from_secs(7)));
    s.on_resumed(token);
    assert_eq!(s.state(), SessionState::Playing);
}

#[test]
fn next_and_prev_stop_at_edges_unless_looping() {
    let mut s = session(3);
    assert_eq!(played(&s.next()).map(|(i, _)| i), Some(0));
    assert_eq!(played(&s.next()).map(|(i, _)| i), Some(1));
    assert_eq!(played(&s.next()).map(|(i, _)| i), Some(2));
    assert!(s.next().is_empty());
    assert_eq!(played(&s.prev()).map(|(i, _)| i), Some(1));
    assert_eq!(played(&s.prev()).map(|(i, _)| i), Some(0));
    assert!(s.prev().is_empty());

    s.loop_mode = LoopMode::LoopAll;
    assert_eq!(played(&s.prev()).map(|(i, _)| i), Some(2));
    assert_eq!(played(&s.next()).map(|(i, _)| i), Some(0));
}

#[test]
fn seek_updates_position_optimistically() {
    let mut s = session(1);
    assert!(s.seek_by(5).is_empty());

    let (_, token) = played(&s.select(0)).unwrap();
    s.on_time_update(token, Duration::from_secs(3));
    assert_eq!(s.seek_by(5), vec![Effect::SeekBy(5)]);
    assert_eq!(s.position(), 8.0);
    assert_eq!(s.seek_by(-20), vec![Effect::SeekBy(-20)]);
    assert_eq!(s.position(), 0.0);
}

#[test]
fn failure_returns_to_idle_with_message() {
    let mut s = session(2);
    let (_, token) = played(&s.select(0)).unwrap();
    s.on_failed(token, "no such file".into());
    assert_eq!(s.state(), SessionState::Idle);
    assert_eq!(s.last_error(), Some("no such file"));

    s.select(1);
    assert_eq!(s.last_error(), None);
}

#[test]
fn load_album_stops_current_playback() {
    let mut s = session(2);
    let (_, token) = played(&s.select(1)).unwrap();
    assert_eq!(s.load_album(5), vec![Effect::Stop]);
    assert_eq!(s.state(), SessionState::Idle);
    assert_eq!(s.track_count(), 5);
    assert!(!s.on_time_update(token, Duration::from_secs(1)));
    assert!(s.load_album(5).is_empty());
}

#[test]
fn loop_mode_cycles_and_maps_from_settings() {
    assert_eq!(LoopMode::NoLoop.cycled(), LoopMode::LoopAll);
    assert_eq!(LoopMode::LoopAll.cycled(), LoopMode::LoopOne);
    assert_eq!(LoopMode::LoopOne.cycled(), LoopMode::NoLoop);
    assert_eq!(
        LoopMode::from(crate::config::LoopModeSetting::LoopOne),
        LoopMode::LoopOne
    );
}
