use std::time::Duration;

use super::testing::{Call, engine, track};
use super::thread::LoadSlot;
use super::*;
use crate::catalog::Track;
use crate::config::{PlayerSettings, RepeatModeSetting};

fn props(track: Option<&Track>, is_playing: bool) -> TransportProps<'_> {
    TransportProps {
        track,
        is_playing,
        queue: &[],
        next_enabled: false,
        previous_enabled: false,
    }
}

#[test]
fn reconcile_with_unchanged_props_loads_once() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 200_000);

    engine.reconcile(props(Some(&a), true));
    engine.reconcile(props(Some(&a), true));
    engine.reconcile(props(Some(&a), true));

    assert_eq!(rec.count(|c| matches!(c, Call::Load(..))), 1);
    assert_eq!(rec.count(|c| *c == Call::Play), 1);
    assert_eq!(engine.phase(), Phase::Playing);
}

#[test]
fn selecting_a_new_track_loads_it_before_any_play() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 200_000);
    let b = track(2, 200_000);

    engine.reconcile(props(Some(&a), true));
    rec.clear();
    engine.reconcile(props(Some(&b), true));

    let calls = rec.calls();
    let load_b = calls
        .iter()
        .position(|c| *c == Call::Load(2, b.preview_url.clone()))
        .expect("B was loaded");
    let first_play = calls.iter().position(|c| *c == Call::Play).expect("B plays");
    assert!(load_b < first_play);
    assert_eq!(engine.state().current_track.as_ref(), Some(&b));
    assert_eq!(engine.phase(), Phase::Playing);
}

#[test]
fn events_from_a_superseded_load_are_ignored() {
    let (mut engine, _rec, rx) = engine();
    let a = track(1, 200_000);
    let b = track(2, 200_000);

    engine.reconcile(props(Some(&a), true));
    let old = engine.generation();
    engine.reconcile(props(Some(&b), true));

    engine.on_resource_event(ResourceEvent::TimeAdvanced {
        generation: old,
        seconds: 12.0,
    });
    engine.on_resource_event(ResourceEvent::MetadataLoaded {
        generation: old,
        duration_seconds: 29.0,
    });
    engine.on_resource_event(ResourceEvent::Ended { generation: old });

    assert_eq!(engine.state().position_seconds, 0.0);
    assert_eq!(engine.state().reported_duration, None);
    assert_eq!(engine.phase(), Phase::Playing);
    assert!(rx.try_recv().is_err());
}

#[test]
fn pause_intent_pauses_the_resource_once() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 200_000);

    engine.reconcile(props(Some(&a), true));
    engine.reconcile(props(Some(&a), false));
    engine.reconcile(props(Some(&a), false));

    assert_eq!(rec.count(|c| *c == Call::Pause), 1);
    assert_eq!(engine.phase(), Phase::Paused);
    assert!(!engine.state().is_playing);
}

#[test]
fn clearing_the_selection_unloads_once() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 200_000);

    engine.reconcile(props(Some(&a), true));
    engine.reconcile(props(None, true));
    engine.reconcile(props(None, true));

    assert_eq!(rec.count(|c| *c == Call::Unload), 1);
    assert!(engine.state().current_track.is_none());
    assert!(!engine.state().is_playing);
    assert_eq!(engine.phase(), Phase::Unloaded);
}

#[test]
fn toggle_play_pause_only_asks_the_shell() {
    let (mut engine, rec, rx) = engine();
    let a = track(1, 200_000);

    engine.toggle_play_pause();
    assert!(rx.try_recv().is_err(), "no message without a track");

    engine.reconcile(props(Some(&a), false));
    rec.clear();
    engine.toggle_play_pause();

    assert_eq!(rx.try_recv().unwrap(), PlayerMsg::PlayPause);
    assert!(rec.calls().is_empty());
    assert!(!engine.state().is_playing);
}

#[test]
fn next_and_previous_follow_enabled_flags() {
    let (mut engine, _rec, rx) = engine();
    let a = track(1, 200_000);
    let queue = vec![a.clone(), track(2, 1_000)];

    engine.reconcile(TransportProps {
        track: Some(&a),
        is_playing: true,
        queue: &queue,
        next_enabled: true,
        previous_enabled: false,
    });
    engine.previous();
    engine.next();

    assert_eq!(rx.try_recv().unwrap(), PlayerMsg::Next);
    assert!(rx.try_recv().is_err());
    assert_eq!(engine.queue().len(), 2);
    assert!(engine.next_enabled());
    assert!(!engine.previous_enabled());
}

#[test]
fn volume_is_clamped_and_sent_as_a_fraction() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 200_000);

    engine.set_volume(150);
    assert_eq!(engine.state().volume_percent(), 100);
    assert!(rec.calls().is_empty(), "nothing loaded yet");

    engine.reconcile(props(Some(&a), false));
    assert!(rec.calls().contains(&Call::Volume(1.0)));

    engine.set_volume(-5);
    assert_eq!(engine.state().volume_percent(), 0);
    assert_eq!(rec.calls().last(), Some(&Call::Volume(0.0)));

    engine.set_volume(40);
    engine.step_volume(15);
    assert_eq!(engine.state().volume_percent(), 55);
    assert_eq!(rec.calls().last(), Some(&Call::Volume(0.55)));
}

#[test]
fn duration_falls_back_to_thirty_seconds_until_reported() {
    let (mut engine, _rec, _rx) = engine();
    let a = track(1, 0);

    assert_eq!(engine.state().duration_seconds(), FALLBACK_DURATION_SECONDS);
    engine.reconcile(props(Some(&a), true));
    assert_eq!(engine.state().duration_seconds(), 30.0);
    assert_eq!(engine.state().display_duration_seconds(), 30.0);

    let generation = engine.generation();
    engine.on_resource_event(ResourceEvent::MetadataLoaded {
        generation,
        duration_seconds: f64::NAN,
    });
    assert_eq!(engine.state().duration_seconds(), 30.0);

    engine.on_resource_event(ResourceEvent::MetadataLoaded {
        generation,
        duration_seconds: 29.5,
    });
    assert_eq!(engine.state().duration_seconds(), 29.5);
}

#[test]
fn reported_duration_bounds_position() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 0);
    engine.reconcile(props(Some(&a), true));
    let generation = engine.generation();

    engine.on_resource_event(ResourceEvent::MetadataLoaded {
        generation,
        duration_seconds: 30.0,
    });
    engine.on_resource_event(ResourceEvent::TimeAdvanced {
        generation,
        seconds: 31.2,
    });
    assert_eq!(engine.state().position_seconds, 30.0);

    engine.seek(-4.0);
    assert_eq!(engine.state().position_seconds, 0.0);
    engine.seek(45.0);
    assert_eq!(engine.state().position_seconds, 30.0);
    assert_eq!(rec.calls().last(), Some(&Call::Seek(30.0)));
    assert_eq!(engine.state().progress_ratio(), 1.0);
}

#[test]
fn position_is_bounded_before_the_duration_is_reported() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 222_000);
    engine.reconcile(props(Some(&a), true));
    let generation = engine.generation();

    engine.seek(10_000.0);
    assert_eq!(engine.state().position_seconds, 222.0);
    assert_eq!(rec.calls().last(), Some(&Call::Seek(222.0)));

    engine.seek(100.0);
    assert_eq!(engine.state().position_seconds, 100.0);

    engine.on_resource_event(ResourceEvent::TimeAdvanced {
        generation,
        seconds: 500.0,
    });
    assert_eq!(engine.state().position_seconds, 222.0);
}

#[test]
fn position_falls_back_to_thirty_seconds_without_any_duration() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 0);
    engine.reconcile(props(Some(&a), true));
    let generation = engine.generation();

    engine.on_resource_event(ResourceEvent::TimeAdvanced {
        generation,
        seconds: 31.5,
    });
    assert_eq!(engine.state().position_seconds, 30.0);

    engine.seek(45.0);
    assert_eq!(rec.calls().last(), Some(&Call::Seek(30.0)));
    assert_eq!(engine.state().progress_ratio(), 1.0);
}

#[test]
fn relative_seek_stays_inside_the_clip() {
    let (mut engine, rec, _rx) = engine();
    let a = track(1, 0);
    engine.reconcile(props(Some(&a), true));

    engine.seek_by(5.0);
    assert_eq!(engine.state().position_seconds, 5.0);
    engine.seek_by(-8.0);
    assert_eq!(engine.state().position_seconds, 0.0);
    engine.seek(27.0);
    engine.seek_by(5.0);
    assert_eq!(engine.state().position_seconds, 30.0);
    assert_eq!(rec.calls().last(), Some(&Call::Seek(30.0)));
}

#[test]
fn seek_without_a_track_is_a_no_op() {
    let (mut engine, rec, _rx) = engine();
    engine.seek(10.0);
    engine.seek_by(5.0);
    assert!(rec.calls().is_empty());
    assert_eq!(engine.state().position_seconds, 0.0);
}

#[test]
fn natural_end_signals_once_and_waits_for_the_shell() {
    let (mut engine, rec, rx) = engine();
    let a = track(1, 0);
    engine.reconcile(props(Some(&a), true));
    let generation = engine.generation();
    engine.on_resource_event(ResourceEvent::MetadataLoaded {
        generation,
        duration_seconds: 30.0,
    });

    engine.on_resource_event(ResourceEvent::Ended { generation });
    engine.on_resource_event(ResourceEvent::Ended { generation });
    assert_eq!(rx.try_recv().unwrap(), PlayerMsg::TrackEnded);
    assert!(rx.try_recv().is_err());
    assert_eq!(engine.state().position_seconds, 30.0);

    // The shell has not processed the end yet; a stale intent must not restart.
    rec.clear();
    engine.reconcile(props(Some(&a), true));
    assert!(rec.calls().is_empty());

    engine.reconcile(props(Some(&a), false));
    assert_eq!(
        engine.phase(),
        Phase::Halted {
            acknowledged: true
        }
    );

    engine.reconcile(props(Some(&a), true));
    assert_eq!(rec.calls(), vec![Call::Seek(0.0), Call::Play]);
    assert_eq!(engine.state().position_seconds, 0.0);
    assert_eq!(engine.phase(), Phase::Playing);
}

#[test]
fn rejected_play_resets_intent_through_the_shell() {
    let (mut engine, rec, rx) = engine();
    let a = track(1, 0);
    rec.reject_play(true);

    engine.reconcile(props(Some(&a), true));
    assert!(matches!(
        rx.try_recv().unwrap(),
        PlayerMsg::PlaybackRejected { .. }
    ));
    assert!(engine.state().last_error.is_some());

    // Intent still true until the shell reacts: no retry storm.
    engine.reconcile(props(Some(&a), true));
    assert!(rx.try_recv().is_err());

    rec.reject_play(false);
    engine.reconcile(props(Some(&a), false));
    rec.clear();
    engine.reconcile(props(Some(&a), true));

    let calls = rec.calls();
    assert!(matches!(calls.first(), Some(Call::Load(2, _))));
    assert_eq!(calls.last(), Some(&Call::Play));
    assert!(engine.state().last_error.is_none());
}

#[test]
fn asynchronous_failure_is_reported_as_rejection() {
    let (mut engine, _rec, rx) = engine();
    let a = track(1, 0);
    engine.reconcile(props(Some(&a), true));

    engine.on_resource_event(ResourceEvent::Failed {
        generation: engine.generation(),
        reason: "HTTP 404".into(),
    });

    assert_eq!(
        rx.try_recv().unwrap(),
        PlayerMsg::PlaybackRejected {
            reason: "HTTP 404".into()
        }
    );
    assert_eq!(engine.state().last_error.as_deref(), Some("HTTP 404"));
}

#[test]
fn preferences_survive_track_changes() {
    let (mut engine, _rec, _rx) = engine();
    let a = track(1, 0);
    let b = track(2, 0);

    engine.reconcile(props(Some(&a), true));
    engine.set_volume(40);
    engine.toggle_shuffle();
    engine.cycle_repeat();
    engine.toggle_like();
    engine.toggle_queue();
    engine.options_mut().set_crossfade_seconds(7);
    engine.options_mut().autoplay_similar = true;

    engine.reconcile(props(Some(&b), true));

    let s = engine.state();
    assert_eq!(s.volume_percent(), 40);
    assert!(s.is_shuffled);
    assert_eq!(s.repeat_mode, RepeatMode::All);
    assert!(s.is_liked);
    assert!(s.queue_visible);
    assert_eq!(s.options.crossfade_seconds(), 7);
    assert!(s.options.autoplay_similar);
}

#[test]
fn shuffle_toggle_is_an_involution() {
    let (mut engine, _rec, _rx) = engine();
    let before = engine.state().is_shuffled;
    engine.toggle_shuffle();
    assert_ne!(engine.state().is_shuffled, before);
    engine.toggle_shuffle();
    assert_eq!(engine.state().is_shuffled, before);
}

#[test]
fn repeat_control_cycles_through_the_engine() {
    let (mut engine, _rec, _rx) = engine();
    assert_eq!(engine.cycle_repeat(), RepeatMode::All);
    assert_eq!(engine.cycle_repeat(), RepeatMode::One);
    assert_eq!(engine.state().repeat_mode.marker(), Some('1'));
    assert_eq!(engine.cycle_repeat(), RepeatMode::Off);
}

#[test]
fn crossfade_is_clamped_to_twelve_seconds() {
    let mut options = PlayerOptions::default();
    options.set_crossfade_seconds(30);
    assert_eq!(options.crossfade_seconds(), 12);
    options.set_crossfade_seconds(-1);
    assert_eq!(options.crossfade_seconds(), 0);
}

#[test]
fn state_from_settings_applies_configured_defaults() {
    let settings = PlayerSettings {
        volume: 20,
        crossfade_seconds: 4,
        shuffle: true,
        repeat: RepeatModeSetting::One,
        autoplay_similar: true,
        normalize_volume: false,
        show_notifications: false,
    };
    let s = PlaybackState::from_settings(&settings);
    assert_eq!(s.volume_percent(), 20);
    assert_eq!(s.volume_level(), 0.2);
    assert_eq!(s.options.crossfade_seconds(), 4);
    assert!(s.is_shuffled);
    assert_eq!(s.repeat_mode, RepeatMode::One);
    assert!(s.options.autoplay_similar);
    assert!(!s.options.normalize_volume);
    assert!(!s.options.show_notifications);
    assert!(!s.is_liked);
}

#[test]
fn load_slot_accepts_only_the_latest_generation() {
    let mut slot = LoadSlot::default();
    assert!(!slot.accepts(1));

    slot.begin(1);
    slot.want_playing = true;
    slot.start_at = Duration::from_secs(3);
    slot.begin(2);

    assert!(!slot.accepts(1));
    assert!(slot.accepts(2));
    assert!(!slot.want_playing);
    assert_eq!(slot.start_at, Duration::ZERO);

    slot.clear();
    assert!(!slot.accepts(2));
    assert_eq!(slot.generation(), None);
}
