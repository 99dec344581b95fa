use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{App, InputMode, View};
use crate::catalog::{CatalogReply, CatalogSource, ReplyTarget, spawn_search};
use crate::config;
use crate::player::{AudioResource, PlaybackEngine, PlayerMsg, ResourceEvent};
use crate::ui;

/// Channels the event loop drains every iteration.
pub struct Channels {
    pub resource_events: Receiver<ResourceEvent>,
    pub player_msgs: Receiver<PlayerMsg>,
    pub catalog_replies: Receiver<CatalogReply>,
    pub catalog_tx: Sender<CatalogReply>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: feeds resource events to the engine, engine
/// messages and catalog replies to the app, reconciles, draws and handles
/// input. Returns `Ok(())` when shutdown is requested.
pub fn run<R: AudioResource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut PlaybackEngine<R>,
    source: &Arc<dyn CatalogSource>,
    channels: &Channels,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for ev in channels.resource_events.try_iter() {
            engine.on_resource_event(ev);
        }
        for msg in channels.player_msgs.try_iter() {
            app.handle_player_msg(msg);
        }
        for reply in channels.catalog_replies.try_iter() {
            app.handle_catalog_reply(reply);
        }

        engine.reconcile(app.transport_props());

        let transport = ui::Transport {
            state: engine.state(),
            queue: engine.queue(),
            next_enabled: engine.next_enabled(),
            previous_enabled: engine.previous_enabled(),
        };
        terminal.draw(|f| ui::draw(f, app, &transport, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, engine, source, channels, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn submit_search(
    req: Option<crate::app::SearchRequest>,
    settings: &config::Settings,
    source: &Arc<dyn CatalogSource>,
    channels: &Channels,
) {
    let Some(req) = req else {
        return;
    };
    info!(query = %req.query, generation = req.generation, "searching catalog");
    spawn_search(
        Arc::clone(source),
        ReplyTarget::Search(req.generation),
        req.query,
        settings.catalog.search_limit,
        channels.catalog_tx.clone(),
    );
}

fn handle_settings_key<R: AudioResource>(key: KeyEvent, engine: &mut PlaybackEngine<R>) -> bool {
    if key.code == KeyCode::Esc {
        engine.toggle_settings();
        return true;
    }
    let options = engine.options_mut();
    match key.code {
        KeyCode::Char('[') => {
            let v = options.crossfade_seconds() as i32 - 1;
            options.set_crossfade_seconds(v);
        }
        KeyCode::Char(']') => {
            let v = options.crossfade_seconds() as i32 + 1;
            options.set_crossfade_seconds(v);
        }
        KeyCode::Char('a') => options.autoplay_similar = !options.autoplay_similar,
        KeyCode::Char('n') => options.normalize_volume = !options.normalize_volume,
        KeyCode::Char('t') => options.show_notifications = !options.show_notifications,
        _ => return false,
    }
    true
}

/// Returns true when the user asked to quit.
fn handle_key_event<R: AudioResource>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut PlaybackEngine<R>,
    source: &Arc<dyn CatalogSource>,
    channels: &Channels,
    state: &mut EventLoopState,
) -> bool {
    if app.input_mode == InputMode::Search {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_search_input(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Enter => {
                let req = app.submit_search();
                submit_search(req, settings, source, channels);
            }
            KeyCode::Char(c) if !c.is_control() => app.push_search_char(c),
            _ => {}
        }
        return false;
    }

    if engine.state().settings_visible && handle_settings_key(key, engine) {
        return false;
    }

    if !matches!(key.code, KeyCode::Char('g')) {
        state.pending_gg = false;
    }

    let seek_step = settings.controls.seek_step_seconds as f64;
    let volume_step = settings.controls.volume_step as i32;

    match key.code {
        KeyCode::Char('q') => {
            debug!("quit requested");
            return true;
        }
        KeyCode::Char('1') => app.set_view(View::Home),
        KeyCode::Char('2') => app.set_view(View::Search),
        KeyCode::Char('3') => app.set_view(View::Library),
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_bottom(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char('p') | KeyCode::Char(' ') => engine.toggle_play_pause(),
        KeyCode::Char('l') => engine.next(),
        KeyCode::Char('h') => engine.previous(),
        KeyCode::Char('L') | KeyCode::Char('H') => {
            let delta = if key.code == KeyCode::Char('L') {
                seek_step
            } else {
                -seek_step
            };
            engine.seek_by(delta);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => engine.step_volume(volume_step),
        KeyCode::Char('-') => engine.step_volume(-volume_step),
        KeyCode::Char('s') => engine.toggle_shuffle(),
        KeyCode::Char('r') => {
            let mode = engine.cycle_repeat();
            debug!(mode = mode.label(), "repeat mode changed");
        }
        KeyCode::Char('f') => engine.toggle_like(),
        KeyCode::Char('u') => engine.toggle_queue(),
        KeyCode::Char('o') => engine.toggle_settings(),
        _ => {}
    }

    false
}
