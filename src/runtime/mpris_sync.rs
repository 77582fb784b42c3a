use crate::app::App;
use crate::mpris::MprisHandle;
use crate::session::SessionState;

/// What was last published over MPRIS: (album, track, state).
pub type MprisSnapshot = (Option<usize>, Option<usize>, SessionState);

pub fn snapshot(app: &App) -> MprisSnapshot {
    (app.open_album, app.session.current(), app.session.state())
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    mpris.set_track_metadata(app.current_album(), app.session.current());
    mpris.set_playback(app.session.state());
}
