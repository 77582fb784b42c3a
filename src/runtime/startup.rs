use std::path::Path;

use tracing::info;

use crate::app::{App, Tab};
use crate::catalog::Scan;
use crate::config;
use crate::session::{LoopMode, PlaybackSession};

/// Build the app from a library scan and the playback and UI defaults.
pub fn build_app(scan: Scan, root: &Path, settings: &config::Settings) -> App {
    let session = PlaybackSession::new(
        LoopMode::from(settings.playback.loop_mode),
        settings.playback.auto_advance,
    );
    let mut app = App::new(scan.albums, session);

    app.autoplay = settings.playback.autoplay;
    app.set_default_tab(Tab::from_setting(settings.ui.default_tab));
    app.library_root = Some(root.display().to_string());

    if !scan.errors.is_empty() {
        let noun = if scan.errors.len() == 1 { "album" } else { "albums" };
        app.set_status(format!(
            "{} {} could not be loaded (see log)",
            scan.errors.len(),
            noun
        ));
    } else if !app.has_albums() {
        app.set_status(format!("No album manifests found under {}", root.display()));
    }

    info!(albums = app.albums.len(), rejected = scan.errors.len(), "Library loaded");
    app
}
