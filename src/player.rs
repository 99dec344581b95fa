//! Playback engine and the audio resource it drives.
//!
//! `engine` holds the transport-bar state machine. It talks to sound through
//! the `AudioResource` trait; `backend` implements that trait with rodio on a
//! dedicated thread (`thread`, `sink`, `fetch`).

mod backend;
mod engine;
mod fetch;
mod repeat;
mod resource;
mod sink;
mod state;
mod thread;
mod types;

pub use backend::RodioResource;
pub use engine::PlaybackEngine;
pub use repeat::RepeatMode;
pub use resource::AudioResource;
pub use state::{FALLBACK_DURATION_SECONDS, Phase, PlaybackState, PlayerOptions};
pub use types::{PlayerMsg, ResourceError, ResourceEvent, TransportProps};

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;
