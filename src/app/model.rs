//! Application model: the shell that owns the selection and the play intent.
//!
//! The playback engine reads `App::transport_props` every loop step and
//! answers with `PlayerMsg`s, which come back in through
//! `App::handle_player_msg`. Nothing else mutates the intent.

use tracing::{debug, info};

use crate::catalog::{CatalogReply, ReplyTarget, Track};
use crate::player::{PlayerMsg, TransportProps};

/// Most tracks kept in the in-session "recently played" list.
pub const RECENT_LIMIT: usize = 50;

/// Sidebar destinations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Home,
    Search,
    Library,
}

impl View {
    pub const ALL: [View; 3] = [View::Home, View::Search, View::Library];

    pub fn label(self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Search => "Search",
            View::Library => "Your Library",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keystrokes edit the search box.
    Search,
}

/// A search the runtime should hand to a catalog worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

/// The main application model.
pub struct App {
    pub view: View,
    pub input_mode: InputMode,
    /// Cursor in the list of the active view.
    pub selected: usize,

    pub featured: Vec<Track>,
    pub featured_loading: bool,
    featured_tiles: usize,

    /// Search box contents while editing.
    pub search_input: String,
    /// Last submitted query.
    pub search_query: String,
    pub results: Vec<Track>,
    pub search_loading: bool,
    search_generation: u64,

    /// Tracks started this session, most recent first. Not persisted.
    pub recent: Vec<Track>,

    pub current_track: Option<Track>,
    pub is_playing: bool,
    /// The list the current track was started from.
    queue: Vec<Track>,

    /// One-line message for the footer, e.g. a playback failure.
    pub status: Option<String>,
}

impl App {
    /// Create an empty `App` showing `featured_tiles` tiles on the home view.
    pub fn new(featured_tiles: usize) -> Self {
        Self {
            view: View::Home,
            input_mode: InputMode::Normal,
            selected: 0,
            featured: Vec::new(),
            featured_loading: false,
            featured_tiles,
            search_input: String::new(),
            search_query: String::new(),
            results: Vec::new(),
            search_loading: false,
            search_generation: 0,
            recent: Vec::new(),
            current_track: None,
            is_playing: false,
            queue: Vec::new(),
            status: None,
        }
    }

    /// Tracks listed by the active view.
    pub fn visible_tracks(&self) -> &[Track] {
        match self.view {
            View::Home => &self.featured,
            View::Search => &self.results,
            View::Library => &self.recent,
        }
    }

    /// Featured tracks shown as tiles above the home list.
    pub fn tiles(&self) -> &[Track] {
        let n = self.featured_tiles.min(self.featured.len());
        &self.featured[..n]
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.visible_tracks().get(self.selected)
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.selected = 0;
        }
    }

    /// Move the cursor down, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.visible_tracks().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.visible_tracks().len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn select_top(&mut self) {
        self.selected = 0;
    }

    pub fn select_bottom(&mut self) {
        self.selected = self.visible_tracks().len().saturating_sub(1);
    }

    fn clamp_selected(&mut self) {
        let len = self.visible_tracks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Start the track under the cursor, queued with the rest of its list.
    pub fn play_selected(&mut self) {
        let Some(track) = self.selected_track().cloned() else {
            return;
        };
        let queue = self.visible_tracks().to_vec();
        self.select_track(track, queue);
    }

    /// Make `track` current and ask for it to play.
    pub fn select_track(&mut self, track: Track, queue: Vec<Track>) {
        info!(track_id = track.id, title = %track.title, "track selected");
        self.queue = queue;
        self.start(track);
    }

    fn start(&mut self, track: Track) {
        self.recent.retain(|t| !t.same_clip(&track));
        self.recent.insert(0, track.clone());
        self.recent.truncate(RECENT_LIMIT);
        self.current_track = Some(track);
        self.is_playing = true;
        self.status = None;
        if self.view == View::Library {
            self.follow_current();
        }
    }

    /// Put the cursor on the current track if the active view lists it.
    pub fn follow_current(&mut self) {
        let Some(current) = self.current_track.as_ref() else {
            return;
        };
        if let Some(idx) = self
            .visible_tracks()
            .iter()
            .position(|t| t.same_clip(current))
        {
            self.selected = idx;
        }
    }

    fn queue_position(&self) -> Option<usize> {
        let current = self.current_track.as_ref()?;
        self.queue.iter().position(|t| t.same_clip(current))
    }

    pub fn has_next(&self) -> bool {
        self.queue_position().is_some_and(|p| p + 1 < self.queue.len())
    }

    pub fn has_previous(&self) -> bool {
        self.queue_position().is_some_and(|p| p > 0)
    }

    /// Apply a request coming up from the playback engine.
    pub fn handle_player_msg(&mut self, msg: PlayerMsg) {
        debug!(?msg, "player message");
        match msg {
            PlayerMsg::PlayPause => {
                if self.current_track.is_some() {
                    self.is_playing = !self.is_playing;
                }
            }
            PlayerMsg::TrackEnded => self.is_playing = false,
            PlayerMsg::Next => self.step_queue(1),
            PlayerMsg::Previous => self.step_queue(-1),
            PlayerMsg::PlaybackRejected { reason } => {
                self.is_playing = false;
                self.status = Some(format!("Playback failed: {reason}"));
            }
        }
    }

    fn step_queue(&mut self, delta: isize) {
        let Some(pos) = self.queue_position() else {
            return;
        };
        let Some(target) = pos.checked_add_signed(delta) else {
            return;
        };
        if let Some(track) = self.queue.get(target).cloned() {
            self.start(track);
            self.follow_current();
        }
    }

    /// What the transport bar should be doing right now.
    pub fn transport_props(&self) -> TransportProps<'_> {
        TransportProps {
            track: self.current_track.as_ref(),
            is_playing: self.is_playing,
            queue: &self.queue,
            next_enabled: self.has_next(),
            previous_enabled: self.has_previous(),
        }
    }

    /// Mark the featured list as loading.
    pub fn begin_featured(&mut self) {
        self.featured_loading = true;
    }

    pub fn finish_featured(&mut self, tracks: Vec<Track>) {
        debug!(count = tracks.len(), "featured tracks loaded");
        self.featured = tracks;
        self.featured_loading = false;
        if self.view == View::Home {
            self.clamp_selected();
        }
    }

    /// Start a search for `query`.
    ///
    /// A blank query clears the results and returns `None`. Otherwise the
    /// returned request carries a generation that supersedes every earlier one.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchRequest> {
        let query = query.trim();
        self.search_generation += 1;
        self.set_view(View::Search);
        self.selected = 0;
        self.results.clear();
        self.search_query = query.to_string();

        if query.is_empty() {
            self.search_loading = false;
            return None;
        }
        self.search_loading = true;
        Some(SearchRequest {
            generation: self.search_generation,
            query: self.search_query.clone(),
        })
    }

    /// Store the reply to search `generation`. Returns false for a
    /// superseded search, whose results are dropped.
    pub fn finish_search(&mut self, generation: u64, tracks: Vec<Track>) -> bool {
        if generation != self.search_generation {
            debug!(generation, current = self.search_generation, "dropping stale search reply");
            return false;
        }
        self.results = tracks;
        self.search_loading = false;
        if self.view == View::Search {
            self.clamp_selected();
        }
        true
    }

    pub fn handle_catalog_reply(&mut self, reply: CatalogReply) {
        match reply.target {
            ReplyTarget::Featured => self.finish_featured(reply.tracks),
            ReplyTarget::Search(generation) => {
                self.finish_search(generation, reply.tracks);
            }
        }
    }

    /// Enter search-input mode with the last query in the box.
    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_input = self.search_query.clone();
        self.set_view(View::Search);
    }

    pub fn cancel_search_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search_input.clear();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Leave input mode and search for what was typed.
    pub fn submit_search(&mut self) -> Option<SearchRequest> {
        self.input_mode = InputMode::Normal;
        let query = std::mem::take(&mut self.search_input);
        self.begin_search(&query)
    }
}
