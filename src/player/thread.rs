use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, trace, warn};

use crate::config::AudioSettings;

use super::fetch::spawn_fetch;
use super::sink::create_sink_at;
use super::types::{ResourceError, ResourceEvent};

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Drop the current clip and start fetching `url`.
    Load { generation: u64, url: String },
    /// A fetch thread finished.
    Fetched {
        generation: u64,
        result: Result<Arc<[u8]>, String>,
    },
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    Unload,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Which load the audio thread is currently serving.
///
/// Fetches finish in any order; only the one matching the latest `Load` may
/// become audible, and it inherits the play/pause and seek requests that
/// arrived while it was downloading.
#[derive(Debug, Default)]
pub(super) struct LoadSlot {
    generation: Option<u64>,
    pub(super) want_playing: bool,
    pub(super) start_at: Duration,
}

impl LoadSlot {
    pub(super) fn begin(&mut self, generation: u64) {
        self.generation = Some(generation);
        self.want_playing = false;
        self.start_at = Duration::ZERO;
    }

    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(super) fn generation(&self) -> Option<u64> {
        self.generation
    }

    pub(super) fn accepts(&self, generation: u64) -> bool {
        self.generation == Some(generation)
    }
}

/// A decoded clip attached to the output.
struct Clip {
    bytes: Arc<[u8]>,
    sink: Sink,
    /// Where `sink` started inside the clip; `get_pos` counts from here.
    offset: Duration,
    finished: bool,
}

impl Clip {
    fn position(&self) -> Duration {
        self.offset + self.sink.get_pos()
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    cmd_tx: Sender<AudioCmd>,
    events: Sender<ResourceEvent>,
    client: reqwest::blocking::Client,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device, previews will not play");
                None
            }
        };

        let mut slot = LoadSlot::default();
        let mut clip: Option<Clip> = None;
        let mut volume: f32 = 1.0;
        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));

        let emit = |event: ResourceEvent| {
            let _ = events.send(event);
        };

        let no_device = |generation: u64| ResourceEvent::Failed {
            generation,
            reason: ResourceError::NoOutputDevice("default output unavailable".into()).to_string(),
        };

        fn rebuild(
            stream: &OutputStream,
            clip: &mut Clip,
            at: Duration,
            playing: bool,
            volume: f32,
        ) -> Result<(), ResourceError> {
            let (sink, _) = create_sink_at(stream, &clip.bytes, at)?;
            sink.set_volume(volume);
            if playing {
                sink.play();
            }
            clip.sink.stop();
            clip.sink = sink;
            clip.offset = at;
            clip.finished = false;
            Ok(())
        }

        fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps: u64 = 20;
            let step_ms = (fade_out_ms / steps).max(1);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(from * (1.0 - t));
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { generation, url } => {
                        if let Some(old) = clip.take() {
                            old.sink.stop();
                        }
                        slot.begin(generation);
                        if stream.is_none() {
                            emit(no_device(generation));
                            continue;
                        }
                        spawn_fetch(client.clone(), generation, url, cmd_tx.clone());
                    }

                    AudioCmd::Fetched { generation, result } => {
                        if !slot.accepts(generation) {
                            trace!(generation, "discarding superseded preview");
                            continue;
                        }
                        let Some(stream) = stream.as_ref() else {
                            continue;
                        };
                        let bytes = match result {
                            Ok(bytes) => bytes,
                            Err(reason) => {
                                emit(ResourceEvent::Failed { generation, reason });
                                continue;
                            }
                        };
                        match create_sink_at(stream, &bytes, slot.start_at) {
                            Ok((sink, total)) => {
                                sink.set_volume(volume);
                                if slot.want_playing {
                                    sink.play();
                                }
                                if let Some(total) = total {
                                    emit(ResourceEvent::MetadataLoaded {
                                        generation,
                                        duration_seconds: total.as_secs_f64(),
                                    });
                                }
                                clip = Some(Clip {
                                    bytes,
                                    sink,
                                    offset: slot.start_at,
                                    finished: false,
                                });
                            }
                            Err(e) => emit(ResourceEvent::Failed {
                                generation,
                                reason: e.to_string(),
                            }),
                        }
                    }

                    AudioCmd::Play => {
                        slot.want_playing = true;
                        let (Some(stream), Some(c)) = (stream.as_ref(), clip.as_mut()) else {
                            if stream.is_none() {
                                if let Some(generation) = slot.generation() {
                                    emit(no_device(generation));
                                }
                            }
                            continue;
                        };
                        if c.finished || c.sink.empty() {
                            // Finished clips restart from the top.
                            if let Err(e) = rebuild(stream, c, Duration::ZERO, true, volume) {
                                if let Some(generation) = slot.generation() {
                                    emit(ResourceEvent::Failed {
                                        generation,
                                        reason: e.to_string(),
                                    });
                                }
                            }
                        } else {
                            c.sink.play();
                        }
                    }

                    AudioCmd::Pause => {
                        slot.want_playing = false;
                        if let Some(c) = clip.as_ref() {
                            c.sink.pause();
                        }
                    }

                    AudioCmd::Seek(at) => {
                        // Scrubbing: rebuild the current sink and skip into the clip.
                        slot.start_at = at;
                        let (Some(stream), Some(c)) = (stream.as_ref(), clip.as_mut()) else {
                            continue;
                        };
                        if let Err(e) = rebuild(stream, c, at, slot.want_playing, volume) {
                            warn!(error = %e, "seek failed");
                        }
                    }

                    AudioCmd::SetVolume(level) => {
                        volume = level.clamp(0.0, 1.0);
                        if let Some(c) = clip.as_ref() {
                            c.sink.set_volume(volume);
                        }
                    }

                    AudioCmd::Unload => {
                        if let Some(old) = clip.take() {
                            old.sink.stop();
                        }
                        slot.clear();
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(c) = clip.take() {
                            if slot.want_playing && !c.sink.empty() {
                                fade_out_sink(&c.sink, volume, fade_out_ms);
                            }
                            c.sink.stop();
                        }
                        debug!("audio thread exiting");
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic position report and end-of-clip detection.
                    let (Some(generation), Some(c)) = (slot.generation(), clip.as_mut()) else {
                        continue;
                    };
                    if !slot.want_playing || c.finished {
                        continue;
                    }
                    if c.sink.empty() {
                        c.finished = true;
                        slot.want_playing = false;
                        emit(ResourceEvent::Ended { generation });
                    } else {
                        emit(ResourceEvent::TimeAdvanced {
                            generation,
                            seconds: c.position().as_secs_f64(),
                        });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
