//! A recording `AudioResource` for engine tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use crate::catalog::Track;

use super::{AudioResource, PlaybackEngine, PlaybackState, PlayerMsg, ResourceError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Load(u64, String),
    Play,
    Pause,
    Seek(f64),
    Volume(f32),
    Unload,
}

/// Records every command and can be told to refuse `play`.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    reject_play: Rc<Cell<bool>>,
}

impl Recorder {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn reject_play(&self, reject: bool) {
        self.reject_play.set(reject);
    }
}

impl AudioResource for Recorder {
    fn load(&mut self, generation: u64, url: &str) {
        self.calls
            .borrow_mut()
            .push(Call::Load(generation, url.to_string()));
    }

    fn play(&mut self) -> Result<(), ResourceError> {
        if self.reject_play.get() {
            return Err(ResourceError::Decode("blocked".into()));
        }
        self.calls.borrow_mut().push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.borrow_mut().push(Call::Seek(seconds));
    }

    fn set_volume(&mut self, level: f32) {
        self.calls.borrow_mut().push(Call::Volume(level));
    }

    fn unload(&mut self) {
        self.calls.borrow_mut().push(Call::Unload);
    }
}

pub(crate) fn engine() -> (PlaybackEngine<Recorder>, Recorder, Receiver<PlayerMsg>) {
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel();
    let engine = PlaybackEngine::new(recorder.clone(), PlaybackState::default(), tx);
    (engine, recorder, rx)
}

pub(crate) fn track(id: i64, duration_millis: u64) -> Track {
    Track {
        id,
        title: format!("Song {id}"),
        artist_name: "Artist".into(),
        album_name: "Album".into(),
        artwork_url: String::new(),
        preview_url: format!("https://audio.test/{id}.m4a"),
        duration_millis,
    }
}
