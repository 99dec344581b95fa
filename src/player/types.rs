//! Messages crossing the playback engine boundary.
//!
//! `TransportProps` flows down from the shell, `PlayerMsg` flows back up, and
//! `ResourceEvent` arrives from the audio resource the engine drives.

use thiserror::Error;

use crate::catalog::Track;

/// Inputs the shell hands to the engine on every reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct TransportProps<'a> {
    pub track: Option<&'a Track>,
    pub is_playing: bool,
    pub queue: &'a [Track],
    /// Whether the shell offers a "next" action right now.
    pub next_enabled: bool,
    /// Whether the shell offers a "previous" action right now.
    pub previous_enabled: bool,
}

/// Requests the engine sends up to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerMsg {
    /// The user pressed play/pause; the shell flips its intent.
    PlayPause,
    /// The current clip finished on its own.
    TrackEnded,
    /// Skip forward in the shell's queue.
    Next,
    /// Skip back in the shell's queue.
    Previous,
    /// The resource refused to play; the shell should drop back to paused.
    PlaybackRejected { reason: String },
}

/// Notifications pushed by an `AudioResource`.
///
/// Every event carries the generation of the load it belongs to so the
/// engine can discard events from a clip that has since been replaced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    TimeAdvanced { generation: u64, seconds: f64 },
    MetadataLoaded { generation: u64, duration_seconds: f64 },
    Ended { generation: u64 },
    Failed { generation: u64, reason: String },
}

impl ResourceEvent {
    pub fn generation(&self) -> u64 {
        match self {
            Self::TimeAdvanced { generation, .. }
            | Self::MetadataLoaded { generation, .. }
            | Self::Ended { generation }
            | Self::Failed { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("audio thread is not running")]
    Disconnected,

    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("failed to fetch preview: {0}")]
    Fetch(String),

    #[error("failed to decode preview: {0}")]
    Decode(String),
}
