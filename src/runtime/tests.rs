use super::*;
use crate::catalog::{CatalogError, Scan};
use crate::config::Settings;

#[test]
fn library_root_prefers_the_argument() {
    let root = library_root(Some("/from/arg".into()), Some("/from/config".into())).unwrap();
    assert_eq!(root, PathBuf::from("/from/arg"));

    let root = library_root(None, Some("/from/config".into())).unwrap();
    assert_eq!(root, PathBuf::from("/from/config"));

    let root = library_root(None, None).unwrap();
    assert_eq!(root, env::current_dir().unwrap());
}

#[test]
fn failed_terminal_setup_restores_before_returning() {
    let mut restored = 0;
    let res: Result<u8, &str> = or_restore(Err("no tty"), || restored += 1);
    assert_eq!(res, Err("no tty"));
    assert_eq!(restored, 1);

    let res: Result<u8, &str> = or_restore(Ok(7), || restored += 1);
    assert_eq!(res, Ok(7));
    assert_eq!(restored, 1);
}

#[test]
fn log_filter_env_override_wins_when_non_empty() {
    assert_eq!(logging::filter_directive("info", None), "info");
    assert_eq!(
        logging::filter_directive("info", Some("lyricdeck=trace".into())),
        "lyricdeck=trace"
    );
    assert_eq!(logging::filter_directive(" warn ", Some("  ".into())), "warn");
}

#[test]
fn build_app_applies_playback_and_ui_defaults() {
    let mut settings = Settings::default();
    settings.playback.autoplay = false;
    settings.playback.auto_advance = false;
    settings.playback.loop_mode = crate::config::LoopModeSetting::LoopOne;
    settings.ui.default_tab = crate::config::TabSetting::None;

    let dir = tempfile::tempdir().unwrap();
    let app = startup::build_app(Scan::default(), dir.path(), &settings);

    assert!(!app.autoplay);
    assert!(!app.session.auto_advance);
    assert_eq!(app.session.loop_mode, crate::session::LoopMode::LoopOne);
    assert_eq!(app.default_tab, None);
    assert!(app.status.as_deref().is_some_and(|s| s.contains("No album manifests")));
}

#[test]
fn build_app_reports_rejected_manifests() {
    let scan = Scan {
        albums: Vec::new(),
        errors: vec![
            CatalogError::manifest("/lib/a/album.toml", "missing field `title`"),
            CatalogError::manifest("/lib/b/album.toml", "missing field `year`"),
        ],
    };
    let dir = tempfile::tempdir().unwrap();
    let app = startup::build_app(scan, dir.path(), &Settings::default());
    assert_eq!(
        app.status.as_deref(),
        Some("2 albums could not be loaded (see log)")
    );
}
