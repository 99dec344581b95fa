use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::{AudioSettings, CatalogSettings};

use super::resource::AudioResource;
use super::thread::{AudioCmd, spawn_audio_thread};
use super::types::{ResourceError, ResourceEvent};

/// `AudioResource` backed by a rodio sink on a dedicated audio thread.
///
/// The thread lives exactly as long as this value: dropping it stops
/// playback and joins the thread.
pub struct RodioResource {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioResource {
    /// Start the audio thread. Events arrive on the returned receiver.
    pub fn new(
        audio_settings: AudioSettings,
        catalog_settings: &CatalogSettings,
    ) -> Result<(Self, Receiver<ResourceEvent>), ResourceError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(catalog_settings.user_agent.as_str())
            .timeout(Duration::from_secs(catalog_settings.timeout_secs))
            .build()
            .map_err(|e| ResourceError::Fetch(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<ResourceEvent>();
        let handle = spawn_audio_thread(rx, tx.clone(), event_tx, client, audio_settings);

        Ok((
            Self {
                tx,
                join: Mutex::new(Some(handle)),
            },
            event_rx,
        ))
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), ResourceError> {
        self.tx.send(cmd).map_err(|_| ResourceError::Disconnected)
    }

    /// Fade out whatever is playing, then stop and join the audio thread.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
                debug!("audio thread joined");
            }
        }
    }
}

impl AudioResource for RodioResource {
    fn load(&mut self, generation: u64, url: &str) {
        let _ = self.send(AudioCmd::Load {
            generation,
            url: url.to_string(),
        });
    }

    fn play(&mut self) -> Result<(), ResourceError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        let at = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::ZERO);
        let _ = self.send(AudioCmd::Seek(at));
    }

    fn set_volume(&mut self, level: f32) {
        let _ = self.send(AudioCmd::SetVolume(level));
    }

    fn unload(&mut self) {
        let _ = self.send(AudioCmd::Unload);
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        self.quit_softly(Duration::ZERO);
    }
}
