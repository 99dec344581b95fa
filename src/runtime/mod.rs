use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::{CatalogReply, CatalogSource, ItunesCatalog};
use crate::player::{PlaybackEngine, PlaybackState, PlayerMsg, RodioResource};

mod event_loop;
mod logging;
mod settings;
mod startup;

/// earshot - browse the iTunes catalog and play 30-second previews in your terminal
#[derive(Parser, Debug)]
#[command(name = "earshot", version, about)]
pub struct Cli {
    /// Search for this right away
    pub query: Vec<String>,

    /// Read settings from this file instead of the XDG location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (settings, config_warning) = settings::load_settings(cli.config.as_deref());

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let _log_guard = logging::init(&settings.logging);
    info!(version = env!("CARGO_PKG_VERSION"), "earshot starting");
    if let Some(msg) = config_warning {
        warn!("{msg}, using defaults");
    }

    let source: Arc<dyn CatalogSource> = Arc::new(ItunesCatalog::new(&settings.catalog)?);
    let (resource, resource_events) = RodioResource::new(settings.audio.clone(), &settings.catalog)?;
    let (player_tx, player_msgs) = mpsc::channel::<PlayerMsg>();
    let mut engine = PlaybackEngine::new(
        resource,
        PlaybackState::from_settings(&settings.player),
        player_tx,
    );

    let (catalog_tx, catalog_replies) = mpsc::channel::<CatalogReply>();
    let mut app = App::new(settings.catalog.featured_tiles);
    let query = cli.query.join(" ");
    let initial_query = (!query.trim().is_empty()).then_some(query.as_str());
    startup::request_initial_tracks(
        &mut app,
        &source,
        &catalog_tx,
        &settings.catalog,
        initial_query,
    );

    let channels = event_loop::Channels {
        resource_events,
        player_msgs,
        catalog_replies,
        catalog_tx,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut engine,
            &source,
            &channels,
            &mut state,
        )
    })();

    engine
        .into_resource()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("earshot exiting");
    run_result
}
