//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: the
//! sidebar, the track lists of each view and the transport bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode, View};
use crate::catalog::Track;
use crate::config::{ControlsSettings, UiSettings};
use crate::format::{format_duration, format_time};
use crate::player::PlaybackState;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("1/2/3".to_string(), "home/search/library".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected song".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L and +/- are filled dynamically from config.
    map.insert("/".to_string(), "search".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("r".to_string(), "repeat".to_string());
    map.insert("f".to_string(), "like".to_string());
    map.insert("u".to_string(), "queue".to_string());
    map.insert("o".to_string(), "settings".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

const SETTINGS_KEYS: &str = "[ ] crossfade -/+ | a autoplay | n normalize | t notifications | o close";

/// What the transport bar needs from the engine.
pub struct Transport<'a> {
    pub state: &'a PlaybackState,
    /// The queue the engine was last handed.
    pub queue: &'a [Track],
    pub next_enabled: bool,
    pub previous_enabled: bool,
}

/// Render the controls help text, incorporating the configured steps.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "1/2/3", "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "/", "+/-", "s", "r", "f",
        "u", "o", "q",
    ];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}s", controls.seek_step_seconds)),
            "+/-" => Some(format!("[+/-] volume {}%", controls.volume_step)),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// `position / total` as shown on the transport bar, e.g. `1:40 / 3:42`.
pub fn time_label(state: &PlaybackState) -> String {
    format!(
        "{} / {}",
        format_time(state.position_seconds),
        format_time(state.display_duration_seconds())
    )
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

fn track_row(index: usize, track: &Track, now_playing: bool) -> ListItem<'static> {
    let marker = if now_playing { "♪" } else { " " };
    let album = if track.album_name.trim().is_empty() {
        "-"
    } else {
        track.album_name.as_str()
    };
    ListItem::new(format!(
        "{marker}{:>3}  {}  ·  {}  ·  {}",
        index + 1,
        track.display(),
        album,
        format_duration(track.duration_millis)
    ))
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    transport: &Transport<'_>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" earshot ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(chunks[1]);

    draw_sidebar(frame, app, body[0]);
    draw_main(frame, app, transport.state, body[1]);
    draw_transport(frame, app, transport, chunks[2]);

    if transport.state.queue_visible {
        draw_queue(frame, transport, body[1]);
    }
    if transport.state.settings_visible {
        draw_settings(frame, transport.state, body[1]);
    }

    let footer_text = match (&app.status, app.input_mode) {
        (_, InputMode::Search) => "[enter] search | [esc] cancel".to_string(),
        (Some(status), _) => format!("{status} | {}", controls_text(controls_settings)),
        (None, _) => controls_text(controls_settings),
    };
    let footer = Paragraph::new(footer_text)
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let items: Vec<ListItem> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| ListItem::new(format!("{} {}", i + 1, v.label())))
        .collect();
    let mut state = ListState::default();
    state.select(View::ALL.iter().position(|v| *v == app.view));
    let nav = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" browse "))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    frame.render_stateful_widget(nav, rows[0], &mut state);

    let (text, style) = match app.input_mode {
        InputMode::Search => (format!("{}_", app.search_input), Style::default().bold()),
        InputMode::Normal if app.search_query.is_empty() => {
            ("press / to search".to_string(), Style::default().dim())
        }
        InputMode::Normal => (app.search_query.clone(), Style::default()),
    };
    let search = Paragraph::new(text).style(style).block(padded(" search "));
    frame.render_widget(search, rows[1]);

    let library = Paragraph::new(vec![
        Line::from("Recently Played"),
        Line::from(format!("{} this session", app.recent.len()).dim()),
    ])
    .block(padded(" library "))
    .wrap(Wrap { trim: true });
    frame.render_widget(library, rows[2]);
}

fn draw_main(frame: &mut Frame, app: &App, state: &PlaybackState, area: Rect) {
    let list_area = if app.view == View::Home && !app.tiles().is_empty() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(area);
        draw_tiles(frame, app, split[0]);
        split[1]
    } else {
        area
    };

    let title = match app.view {
        View::Home => " featured ".to_string(),
        View::Search if app.search_query.is_empty() => " search ".to_string(),
        View::Search => format!(" results for \"{}\" ", app.search_query),
        View::Library => " recently played ".to_string(),
    };
    let tracks = app.visible_tracks();

    let placeholder = match app.view {
        View::Home if app.featured_loading => Some("Loading featured tracks..."),
        View::Search if app.search_loading => Some("Searching..."),
        _ if !tracks.is_empty() => None,
        View::Home => Some("Nothing featured right now."),
        View::Search if app.search_query.is_empty() => Some("Press / to search for songs."),
        View::Search => Some("No tracks found."),
        View::Library => Some("Nothing played yet."),
    };
    if let Some(text) = placeholder {
        let p = Paragraph::new(text.dim())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(p, list_area);
        return;
    }

    let items: Vec<ListItem> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let now = state.current_track.as_ref().is_some_and(|c| c.same_clip(t));
            track_row(i, t, now)
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(app.selected.min(tracks.len() - 1)));
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

fn draw_tiles(frame: &mut Frame, app: &App, area: Rect) {
    let tiles = app.tiles();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(tiles.iter().map(|_| Constraint::Ratio(1, tiles.len() as u32)))
        .split(area);
    for (track, col) in tiles.iter().zip(cols.iter()) {
        let tile = Paragraph::new(vec![
            Line::from(track.title.clone().bold()),
            Line::from(track.artist_name.clone()),
            Line::from(format_duration(track.duration_millis).dim()),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tile, *col);
    }
}

fn control(symbol: &str, active: bool, enabled: bool) -> Span<'static> {
    let span = Span::raw(format!(" {symbol} "));
    if !enabled {
        span.dim()
    } else if active {
        span.fg(Color::Green).bold()
    } else {
        span
    }
}

fn draw_transport(frame: &mut Frame, app: &App, transport: &Transport<'_>, area: Rect) {
    let state = transport.state;
    let block = Block::default().borders(Borders::ALL).title(" now playing ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let Some(track) = state.current_track.as_ref() else {
        let idle = Paragraph::new("Pick a song to hear a 30 second preview.".dim())
            .alignment(Alignment::Center);
        frame.render_widget(idle, rows[0]);
        return;
    };

    let heart = if state.is_liked { "♥" } else { "♡" };
    let mut info = vec![
        Span::raw(format!("{heart} ")),
        Span::raw(track.display()).bold(),
    ];
    if !track.album_name.trim().is_empty() {
        info.push(Span::raw(format!("  ({})", track.album_name)).dim());
    }
    frame.render_widget(Paragraph::new(Line::from(info)), rows[0]);

    let has_track = app.current_track.is_some();
    let play = if state.is_playing { "⏸" } else { "▶" };
    let repeat = match state.repeat_mode.marker() {
        Some(m) => format!("⟳{m}"),
        None => "⟳".to_string(),
    };
    let mut controls = vec![
        control("⇄", state.is_shuffled, true),
        control("⏮", false, transport.previous_enabled),
        control(play, false, has_track),
        control("⏭", false, transport.next_enabled),
        control(&repeat, state.repeat_mode.is_active(), true),
        Span::raw(format!("   vol {}%", state.volume_percent())),
    ];
    if let Some(err) = &state.last_error {
        controls.push(Span::raw(format!("   {err}")).fg(Color::Red));
    }
    frame.render_widget(
        Paragraph::new(Line::from(controls)).alignment(Alignment::Center),
        rows[1],
    );

    let gauge = Gauge::default()
        .ratio(state.progress_ratio())
        .label(time_label(state))
        .gauge_style(Style::default().fg(Color::Green));
    frame.render_widget(gauge, rows[2]);
}

fn draw_queue(frame: &mut Frame, transport: &Transport<'_>, area: Rect) {
    let popup = centered_rect_sized(64, 14, area);
    frame.render_widget(Clear, popup);

    let current = transport.state.current_track.as_ref();
    let items: Vec<ListItem> = transport
        .queue
        .iter()
        .enumerate()
        .map(|(i, t)| track_row(i, t, current.is_some_and(|c| c.same_clip(t))))
        .collect();
    let content: List = if items.is_empty() {
        List::new(vec![ListItem::new("Queue is empty.")])
    } else {
        List::new(items)
    };
    frame.render_widget(content.block(padded(" queue (u closes) ")), popup);
}

fn draw_settings(frame: &mut Frame, state: &PlaybackState, area: Rect) {
    let popup = centered_rect_sized(52, 9, area);
    frame.render_widget(Clear, popup);

    let on_off = |b: bool| if b { "on" } else { "off" };
    let options = &state.options;
    let text = vec![
        Line::from(format!("Crossfade: {}s", options.crossfade_seconds())),
        Line::from(format!("Autoplay similar: {}", on_off(options.autoplay_similar))),
        Line::from(format!("Normalize volume: {}", on_off(options.normalize_volume))),
        Line::from(format!("Show notifications: {}", on_off(options.show_notifications))),
        Line::from(SETTINGS_KEYS.dim()),
    ];
    let p = Paragraph::new(text)
        .block(padded(" settings "))
        .wrap(Wrap { trim: true });
    frame.render_widget(p, popup);
}
