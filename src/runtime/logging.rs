use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_dir};

pub const LOG_FILE: &str = "earshot.log";

/// Environment variable whose filter directives replace `logging.level`.
pub const LOG_ENV: &str = "EARSHOT_LOG";

/// Send `tracing` output to `earshot.log`; the terminal belongs to the UI.
///
/// Returns `None` when no log directory can be used. Keep the guard alive
/// until exit or buffered lines are lost.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let dir: PathBuf = settings.directory.clone().or_else(default_log_dir)?;
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("earshot: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }
    Some(guard)
}
