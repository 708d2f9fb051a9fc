use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/songdeck/config.toml` or `~/.config/songdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SONGDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub library: LibrarySettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the server that serves folder listings and songs.
    pub base_url: String,
    /// Path segment under which folders live (`<base_url>/<songs_path>/<folder>/`).
    pub songs_path: String,
    /// Timeout for a single listing or track request (milliseconds).
    pub timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            songs_path: "songs".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Folder loaded at startup.
    pub default_folder: String,
    /// Listing entries whose resolved URL ends with this literal suffix are tracks.
    pub track_suffix: String,
    /// Folder cards shown in the menu.
    pub folders: Vec<FolderCard>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            default_folder: "Happy_Hits".to_string(),
            track_suffix: ".mp3".to_string(),
            folders: vec![FolderCard {
                id: "Happy_Hits".to_string(),
                title: "Happy Hits".to_string(),
                description: "Songs to lift your mood".to_string(),
            }],
        }
    }
}

/// A selectable folder in the menu.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FolderCard {
    /// Folder identifier as it appears in the listing URL.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl FolderCard {
    /// Title to show, falling back to the folder id.
    pub fn label(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume at startup, 0-100.
    pub initial_volume: u8,
    /// Volume change per `+`/`-` key press.
    pub volume_step: u8,
    /// How often the audio thread reports the playback position (milliseconds).
    pub tick_ms: u64,
    /// Upper bound on a downloaded track body (bytes).
    pub max_track_bytes: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 100,
            volume_step: 10,
            tick_ms: 250,
            max_track_bytes: 64 * 1024 * 1024,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Secondary label shown under every playlist row.
    pub row_label: String,
    /// Whether the folder menu starts open.
    pub menu_open: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ songdeck ~ ".to_string(),
            row_label: "Unknown artist".to_string(),
            menu_open: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file path. Relative paths are resolved against the state directory.
    pub file: Option<std::path::PathBuf>,
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}
