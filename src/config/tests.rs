use super::load::{default_config_path, default_state_dir, resolve_config_path};
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
fn resolve_config_path_prefers_songdeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SONGDECK_CONFIG_PATH", "/tmp/songdeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/songdeck-test-config.toml")
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
            .join("songdeck")
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
            .join("songdeck")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_uses_local_state_without_xdg() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/songdeck")
    );
}

#[test]
fn defaults_point_at_local_server_and_happy_hits() {
    let s = Settings::default();
    assert_eq!(s.server.base_url, "http://127.0.0.1:3000");
    assert_eq!(s.server.songs_path, "songs");
    assert_eq!(s.library.default_folder, "Happy_Hits");
    assert_eq!(s.library.track_suffix, ".mp3");
    assert_eq!(s.library.folders.len(), 1);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file_with_folder_cards() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[server]
base_url = "http://10.0.0.5:8080"
timeout_ms = 2500

[library]
default_folder = "Chill"

[[library.folders]]
id = "Chill"
title = "Chill Vibes"

[[library.folders]]
id = "Workout"

[audio]
initial_volume = 40
quit_fade_out_ms = 123

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
row_label = "Various"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SONGDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SONGDECK__AUDIO__INITIAL_VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.server.base_url, "http://10.0.0.5:8080");
    assert_eq!(s.server.timeout_ms, 2500);
    assert_eq!(s.server.songs_path, "songs");
    assert_eq!(s.library.default_folder, "Chill");
    assert_eq!(s.library.track_suffix, ".mp3");
    assert_eq!(s.library.folders.len(), 2);
    assert_eq!(s.library.folders[0].label(), "Chill Vibes");
    assert_eq!(s.library.folders[1].label(), "Workout");
    assert_eq!(s.audio.initial_volume, 40);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.row_label, "Various");
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
initial_volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SONGDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SONGDECK__AUDIO__INITIAL_VOLUME", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.initial_volume, 15);
}

#[test]
fn folder_cards_parse_from_toml_fragment() {
    let lib: LibrarySettings = toml::from_str(
        r#"
default_folder = "A"
folders = [{ id = "A", title = "Alpha", description = "first" }, { id = "B" }]
"#,
    )
    .unwrap();
    assert_eq!(lib.default_folder, "A");
    assert_eq!(lib.track_suffix, ".mp3");
    assert_eq!(lib.folders[0].description, "first");
    assert_eq!(lib.folders[1].title, "");
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.server.base_url = "not a url".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.track_suffix.clear();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());
}
