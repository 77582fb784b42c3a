use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_lyricdeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("LYRICDECK_CONFIG_PATH", "/tmp/lyricdeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/lyricdeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("lyricdeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("lyricdeck")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/state");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/state/lyricdeck/lyricdeck.log")
    );

    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/lyricdeck/lyricdeck.log")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
autoplay = false
auto_advance = false
loop_mode = "repeat-album"
tick_ms = 250

[audio]
crossfade_ms = 0
crossfade_steps = 3
quit_fade_out_ms = 123

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
default_tab = "closed"
smooth_scroll = false
scroll_easing = 0.5
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[library]
root = "/srv/albums"
manifest_names = ["release.toml"]
include_hidden = true
lrc_sidecars = false

[logging]
level = "debug"
file = "/tmp/lyricdeck.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LYRICDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("LYRICDECK__AUDIO__CROSSFADE_MS");

    let s = Settings::load().unwrap();
    assert!(!s.playback.autoplay);
    assert!(!s.playback.auto_advance);
    assert_eq!(s.playback.loop_mode, LoopModeSetting::LoopAll);
    assert_eq!(s.playback.tick_ms, 250);
    assert_eq!(s.audio.crossfade_steps, 3);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.default_tab, TabSetting::None);
    assert!(!s.ui.smooth_scroll);
    assert_eq!(s.ui.scroll_easing, 0.5);
    assert_eq!(
        s.ui.now_playing_time_fields,
        vec![TimeField::Elapsed, TimeField::Remaining]
    );
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.library.root, Some(std::path::PathBuf::from("/srv/albums")));
    assert_eq!(s.library.manifest_names, vec!["release.toml".to_string()]);
    assert!(s.library.include_hidden);
    assert!(!s.library.lrc_sidecars);
    assert!(s.library.read_durations);
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
crossfade_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("LYRICDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("LYRICDECK__AUDIO__CROSSFADE_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.crossfade_ms, 0);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "LYRICDECK_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.loop_mode, LoopModeSetting::NoLoop);
    assert!(s.playback.autoplay);
    assert!(s.playback.auto_advance);
    assert_eq!(s.ui.default_tab, TabSetting::Lyrics);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_nonsense_values() {
    let mut s = Settings::default();
    s.audio.crossfade_steps = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.scroll_easing = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.scroll_easing = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.tick_ms = 1;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.manifest_names = vec!["  ".to_string()];
    assert!(s.validate().is_err());
}
