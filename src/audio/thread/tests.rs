use super::*;
use std::sync::mpsc::{self, Receiver};

fn driver(settings: AudioSettings) -> (Driver, Receiver<DriverEvent>) {
    let (tx, rx) = mpsc::channel();
    (Driver::new(None, tx, settings), rx)
}

/// A sink that is not connected to any output. Nothing is queued, so it
/// reports itself as drained right away.
fn detached_sink() -> Sink {
    let (sink, _queue) = Sink::new();
    sink
}

fn drain(rx: &Receiver<DriverEvent>) -> Vec<DriverEvent> {
    rx.try_iter().collect()
}

#[test]
fn play_without_output_device_reports_failure() {
    let (mut d, rx) = driver(AudioSettings::default());
    d.handle(AudioCmd::Play {
        token: 7,
        path: PathBuf::from("/music/01.flac"),
    });

    let events = drain(&rx);
    assert!(matches!(events.as_slice(), [DriverEvent::Failed { token: 7, .. }]));
    assert!(d.sink.is_none());
    assert_eq!(d.token, None);
}

#[test]
fn start_announces_position_zero() {
    let (mut d, rx) = driver(AudioSettings::default());
    d.start(1, PathBuf::from("a.ogg"), detached_sink());

    match drain(&rx).as_slice() {
        [DriverEvent::TimeUpdate { token: 1, position }] => {
            assert!(*position < Duration::from_millis(50));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn drained_sink_ends_the_track_once() {
    let (mut d, rx) = driver(AudioSettings::default());
    d.start(3, PathBuf::from("a.ogg"), detached_sink());
    drain(&rx);

    d.tick();
    assert_eq!(drain(&rx), vec![DriverEvent::Ended { token: 3 }]);
    assert_eq!(d.token, None);

    d.tick();
    assert!(drain(&rx).is_empty());
}

#[test]
fn paused_driver_is_silent_and_its_clock_stops() {
    let (mut d, rx) = driver(AudioSettings::default());
    d.start(4, PathBuf::from("a.ogg"), detached_sink());
    drain(&rx);

    d.toggle_pause();
    assert_eq!(drain(&rx), vec![DriverEvent::Paused { token: 4 }]);

    let frozen = d.elapsed();
    thread::sleep(Duration::from_millis(20));
    d.tick();
    assert!(drain(&rx).is_empty());
    assert_eq!(d.elapsed(), frozen);

    d.toggle_pause();
    assert_eq!(drain(&rx), vec![DriverEvent::Resumed { token: 4 }]);
    thread::sleep(Duration::from_millis(20));
    assert!(d.elapsed() >= frozen + Duration::from_millis(20));
}

#[test]
fn transport_without_a_track_does_nothing() {
    let (mut d, rx) = driver(AudioSettings::default());
    d.toggle_pause();
    d.seek_by(5);
    d.tick();
    d.stop();
    assert!(drain(&rx).is_empty());
}

#[test]
fn crossfaded_track_clock_includes_the_fade() {
    let settings = AudioSettings {
        crossfade_ms: 60,
        crossfade_steps: 3,
        ..AudioSettings::default()
    };
    let (mut d, rx) = driver(settings);
    d.start(1, PathBuf::from("a.ogg"), detached_sink());
    drain(&rx);

    // The new track starts playing at the first fade step, so by the time
    // the swap completes it has been audible for the whole fade.
    d.start(2, PathBuf::from("b.ogg"), detached_sink());
    match drain(&rx).as_slice() {
        [DriverEvent::TimeUpdate { token: 2, position }] => {
            assert!(*position >= Duration::from_millis(60));
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert!(d.elapsed() >= Duration::from_millis(60));
}
