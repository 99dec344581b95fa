//! The playback engine behind the transport bar.
//!
//! The engine never owns the play/pause intent: the shell does. Each event
//! loop step the shell calls `reconcile` with its current selection and
//! intent, and the engine issues only the resource commands needed to bring
//! the resource in line. User actions that would change the intent are sent
//! upward as `PlayerMsg`s instead.

use std::sync::mpsc::Sender;

use tracing::{debug, trace, warn};

use crate::catalog::Track;

use super::repeat::RepeatMode;
use super::resource::AudioResource;
use super::state::{Phase, PlaybackState, PlayerOptions};
use super::types::{PlayerMsg, ResourceEvent, TransportProps};

/// Positions this close to the end count as "at the end" when restarting.
const END_EPSILON_SECONDS: f64 = 0.05;

pub struct PlaybackEngine<R: AudioResource> {
    resource: R,
    state: PlaybackState,
    outbox: Sender<PlayerMsg>,
    phase: Phase,
    /// Bumped on every load; events tagged with an older value are stale.
    generation: u64,
    queue: Vec<Track>,
    next_enabled: bool,
    previous_enabled: bool,
}

impl<R: AudioResource> PlaybackEngine<R> {
    pub fn new(resource: R, state: PlaybackState, outbox: Sender<PlayerMsg>) -> Self {
        Self {
            resource,
            state,
            outbox,
            phase: Phase::Unloaded,
            generation: 0,
            queue: Vec::new(),
            next_enabled: false,
            previous_enabled: false,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn next_enabled(&self) -> bool {
        self.next_enabled
    }

    pub fn previous_enabled(&self) -> bool {
        self.previous_enabled
    }

    /// Tear the engine down and hand back the resource, e.g. for a graceful stop.
    pub fn into_resource(self) -> R {
        self.resource
    }

    /// Bring the resource in line with the shell's selection and intent.
    ///
    /// Calling this again with unchanged props issues no resource command.
    pub fn reconcile(&mut self, props: TransportProps<'_>) {
        self.next_enabled = props.next_enabled;
        self.previous_enabled = props.previous_enabled;
        if !same_tracks(&self.queue, props.queue) {
            self.queue = props.queue.to_vec();
        }

        let Some(track) = props.track else {
            self.state.is_playing = false;
            if self.phase != Phase::Unloaded {
                debug!(generation = self.generation, "selection cleared, unloading preview");
                self.resource.unload();
                self.phase = Phase::Unloaded;
                self.state.current_track = None;
                self.state.reset_timeline();
            }
            return;
        };

        let changed = match self.state.current_track.as_ref() {
            Some(current) => !current.same_clip(track),
            None => true,
        };
        if changed {
            self.load(track);
        }

        self.state.is_playing = props.is_playing;
        self.apply_intent(props.is_playing);
    }

    fn load(&mut self, track: &Track) {
        self.generation += 1;
        debug!(
            generation = self.generation,
            track_id = track.id,
            url = %track.preview_url,
            "loading preview"
        );
        self.state.current_track = Some(track.clone());
        self.state.reset_timeline();
        self.state.last_error = None;
        self.phase = Phase::Paused;
        self.resource.load(self.generation, &track.preview_url);
        self.resource.set_volume(self.state.volume_level());
    }

    fn apply_intent(&mut self, wants_playing: bool) {
        match (self.phase, wants_playing) {
            (Phase::Paused, true) => self.start(),
            (Phase::Playing, false) => {
                self.resource.pause();
                self.phase = Phase::Paused;
            }
            (Phase::Halted { acknowledged: false }, false) => {
                self.phase = Phase::Halted { acknowledged: true };
            }
            (Phase::Halted { acknowledged: true }, true) => self.restart(),
            _ => {}
        }
    }

    fn start(&mut self) {
        match self.resource.play() {
            Ok(()) => {
                self.phase = Phase::Playing;
                self.state.last_error = None;
            }
            Err(e) => self.halt_with_error(e.to_string()),
        }
    }

    /// Play again after the clip ended or failed.
    fn restart(&mut self) {
        if self.state.last_error.is_some() {
            // A failed clip is fetched again from scratch.
            if let Some(track) = self.state.current_track.clone() {
                self.load(&track);
            }
        } else {
            let at_end = match self.state.reported_duration {
                Some(d) => self.state.position_seconds >= d - END_EPSILON_SECONDS,
                None => true,
            };
            if at_end {
                self.state.position_seconds = 0.0;
            }
            self.resource.seek(self.state.position_seconds);
        }
        self.start();
    }

    fn halt_with_error(&mut self, reason: String) {
        warn!(generation = self.generation, %reason, "preview playback rejected");
        self.phase = Phase::Halted {
            acknowledged: false,
        };
        self.state.last_error = Some(reason.clone());
        self.send(PlayerMsg::PlaybackRejected { reason });
    }

    /// Apply a notification from the resource.
    pub fn on_resource_event(&mut self, event: ResourceEvent) {
        if self.phase == Phase::Unloaded || event.generation() != self.generation {
            trace!(?event, current = self.generation, "dropping stale resource event");
            return;
        }

        match event {
            ResourceEvent::TimeAdvanced { seconds, .. } => {
                if matches!(self.phase, Phase::Halted { .. }) {
                    return;
                }
                self.state.position_seconds = self.clamp_position(seconds);
            }
            ResourceEvent::MetadataLoaded {
                duration_seconds, ..
            } => {
                if duration_seconds.is_finite() && duration_seconds > 0.0 {
                    self.state.reported_duration = Some(duration_seconds);
                    self.state.position_seconds = self.clamp_position(self.state.position_seconds);
                }
            }
            ResourceEvent::Ended { .. } => {
                if self.phase != Phase::Playing {
                    return;
                }
                debug!(generation = self.generation, "preview ended");
                self.phase = Phase::Halted {
                    acknowledged: false,
                };
                if let Some(d) = self.state.reported_duration {
                    self.state.position_seconds = d;
                }
                self.send(PlayerMsg::TrackEnded);
            }
            ResourceEvent::Failed { reason, .. } => {
                if matches!(self.phase, Phase::Halted { .. }) {
                    return;
                }
                self.halt_with_error(reason);
            }
        }
    }

    /// Ask the shell to flip its play intent.
    pub fn toggle_play_pause(&self) {
        if self.state.current_track.is_some() {
            self.send(PlayerMsg::PlayPause);
        }
    }

    pub fn next(&self) {
        if self.next_enabled {
            self.send(PlayerMsg::Next);
        }
    }

    pub fn previous(&self) {
        if self.previous_enabled {
            self.send(PlayerMsg::Previous);
        }
    }

    /// Jump to `target_seconds`, updating the shown position immediately.
    pub fn seek(&mut self, target_seconds: f64) {
        if self.phase == Phase::Unloaded || !target_seconds.is_finite() {
            return;
        }
        let target = self.clamp_position(target_seconds);
        self.state.position_seconds = target;
        self.resource.seek(target);
    }

    /// Seek relative to the current position, e.g. for the scrub keys.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek(self.state.position_seconds + delta_seconds);
    }

    /// Set the volume in percent; values outside `[0, 100]` are clamped.
    pub fn set_volume(&mut self, percent: i32) {
        self.state.set_volume_percent(percent);
        if self.phase != Phase::Unloaded {
            self.resource.set_volume(self.state.volume_level());
        }
    }

    pub fn step_volume(&mut self, delta: i32) {
        self.set_volume(self.state.volume_percent() as i32 + delta);
    }

    pub fn toggle_like(&mut self) {
        self.state.is_liked = !self.state.is_liked;
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffled = !self.state.is_shuffled;
    }

    pub fn cycle_repeat(&mut self) -> RepeatMode {
        self.state.repeat_mode = self.state.repeat_mode.advance();
        self.state.repeat_mode
    }

    pub fn toggle_queue(&mut self) {
        self.state.queue_visible = !self.state.queue_visible;
    }

    pub fn toggle_settings(&mut self) {
        self.state.settings_visible = !self.state.settings_visible;
    }

    pub fn options_mut(&mut self) -> &mut PlayerOptions {
        &mut self.state.options
    }

    /// Bound a position to `[0, duration]`, using the displayed duration
    /// until the resource reports the real one.
    fn clamp_position(&self, seconds: f64) -> f64 {
        seconds.max(0.0).min(self.state.display_duration_seconds())
    }

    fn send(&self, msg: PlayerMsg) {
        if self.outbox.send(msg).is_err() {
            debug!("player message dropped, shell is gone");
        }
    }
}

fn same_tracks(a: &[Track], b: &[Track]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_clip(y))
}
