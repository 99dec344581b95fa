use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/earshot/config.toml` or `~/.config/earshot/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `EARSHOT__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub player: PlayerSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Search endpoint.
    pub base_url: String,
    /// Optional two-letter storefront code (e.g. "US").
    pub country: Option<String>,
    /// Page size for user searches.
    pub search_limit: usize,
    /// Query used to fill the home view at startup.
    pub featured_query: String,
    /// Page size for the featured query.
    pub featured_limit: usize,
    /// How many featured tracks are shown as tiles above the list.
    pub featured_tiles: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com/search".to_string(),
            country: None,
            search_limit: 50,
            featured_query: "popular music 2024".to_string(),
            featured_limit: 20,
            featured_tiles: 8,
            timeout_secs: 10,
            user_agent: concat!("earshot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Transport-bar defaults applied when the player starts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Initial volume, 0-100.
    pub volume: u8,
    /// Stored crossfade value in seconds, 0-12. It does not mix audio.
    pub crossfade_seconds: u8,
    pub shuffle: bool,
    pub repeat: RepeatModeSetting,
    pub autoplay_similar: bool,
    pub normalize_volume: bool,
    pub show_notifications: bool,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            volume: 75,
            crossfade_seconds: 0,
            shuffle: false,
            repeat: RepeatModeSetting::Off,
            autoplay_similar: false,
            normalize_volume: true,
            show_notifications: true,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatModeSetting {
    #[serde(alias = "none", alias = "no-loop", alias = "no_loop")]
    Off,
    #[serde(alias = "loop-all", alias = "loop_all", alias = "repeat-all")]
    All,
    #[serde(alias = "loop-one", alias = "loop_one", alias = "repeat-one")]
    One,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the audio thread reports the playback position (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub seek_step_seconds: u64,
    /// Volume change per `+` / `-` press, in percent.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_seconds: 5,
            volume_step: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ thirty seconds of everything ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `EARSHOT_LOG` overrides it.
    pub level: String,
    /// Directory for `earshot.log`. Defaults to the XDG state directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
