//! Engine-owned playback state.

use crate::catalog::Track;
use crate::config::PlayerSettings;

use super::repeat::RepeatMode;

/// Duration shown before the resource reports one; preview clips run 30 seconds.
pub const FALLBACK_DURATION_SECONDS: f64 = 30.0;

pub const MAX_VOLUME: u8 = 100;
pub const MAX_CROSSFADE_SECONDS: u8 = 12;

/// Settings-panel values. They are stored and displayed, nothing consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    crossfade_seconds: u8,
    pub autoplay_similar: bool,
    pub normalize_volume: bool,
    pub show_notifications: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            crossfade_seconds: 0,
            autoplay_similar: false,
            normalize_volume: true,
            show_notifications: true,
        }
    }
}

impl PlayerOptions {
    pub fn crossfade_seconds(&self) -> u8 {
        self.crossfade_seconds
    }

    /// Store a crossfade value, clamped to `[0, 12]`.
    pub fn set_crossfade_seconds(&mut self, secs: i32) {
        self.crossfade_seconds = secs.clamp(0, MAX_CROSSFADE_SECONDS as i32) as u8;
    }
}

/// Where the underlying resource is, as far as the engine knows.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded.
    Unloaded,
    /// Loaded and not playing.
    Paused,
    Playing,
    /// Stopped on its own (end of clip or failure). `acknowledged` turns true
    /// once the shell's intent has been seen as paused, after which a new
    /// play intent may restart the clip.
    Halted { acknowledged: bool },
}

/// Everything the transport bar shows and the engine remembers across tracks.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    /// Last play intent observed from the shell.
    pub is_playing: bool,
    pub position_seconds: f64,
    /// Duration reported by the resource, once known.
    pub reported_duration: Option<f64>,
    volume_percent: u8,
    pub is_liked: bool,
    pub is_shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub options: PlayerOptions,
    pub queue_visible: bool,
    pub settings_visible: bool,
    /// Last playback failure, shown until the next successful start.
    pub last_error: Option<String>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            is_playing: false,
            position_seconds: 0.0,
            reported_duration: None,
            volume_percent: 75,
            is_liked: false,
            is_shuffled: false,
            repeat_mode: RepeatMode::Off,
            options: PlayerOptions::default(),
            queue_visible: false,
            settings_visible: false,
            last_error: None,
        }
    }
}

impl PlaybackState {
    /// Initial state with the configured transport defaults.
    pub fn from_settings(settings: &PlayerSettings) -> Self {
        let mut options = PlayerOptions {
            autoplay_similar: settings.autoplay_similar,
            normalize_volume: settings.normalize_volume,
            show_notifications: settings.show_notifications,
            ..PlayerOptions::default()
        };
        options.set_crossfade_seconds(settings.crossfade_seconds as i32);

        let mut state = Self {
            is_shuffled: settings.shuffle,
            repeat_mode: settings.repeat.into(),
            options,
            ..Self::default()
        };
        state.set_volume_percent(settings.volume as i32);
        state
    }

    pub fn volume_percent(&self) -> u8 {
        self.volume_percent
    }

    /// Store a volume, clamped to `[0, 100]`, and return the stored value.
    pub(super) fn set_volume_percent(&mut self, percent: i32) -> u8 {
        self.volume_percent = percent.clamp(0, MAX_VOLUME as i32) as u8;
        self.volume_percent
    }

    /// Resource gain matching the stored volume, always in `[0.0, 1.0]`.
    pub fn volume_level(&self) -> f32 {
        self.volume_percent as f32 / 100.0
    }

    /// Reported duration, or the fallback while the resource has not said.
    pub fn duration_seconds(&self) -> f64 {
        self.reported_duration.unwrap_or(FALLBACK_DURATION_SECONDS)
    }

    /// Total shown on the transport bar and used as the seek bar range.
    ///
    /// Before the resource reports, the catalog's nominal duration is shown
    /// when it has one.
    pub fn display_duration_seconds(&self) -> f64 {
        if let Some(d) = self.reported_duration {
            return d;
        }
        match self.current_track.as_ref().map(|t| t.duration_millis) {
            Some(ms) if ms > 0 => ms as f64 / 1000.0,
            _ => FALLBACK_DURATION_SECONDS,
        }
    }

    /// Playback progress in `[0.0, 1.0]` for the seek bar.
    pub fn progress_ratio(&self) -> f64 {
        let total = self.display_duration_seconds();
        if total <= 0.0 {
            return 0.0;
        }
        (self.position_seconds / total).clamp(0.0, 1.0)
    }

    pub(super) fn reset_timeline(&mut self) {
        self.position_seconds = 0.0;
        self.reported_duration = None;
    }
}
