use std::path::Path;

use crate::config;

/// Load settings, falling back to defaults when the file or environment is
/// unusable. The second value explains the fallback so it can be logged once
/// logging is up.
pub fn load_settings(path: Option<&Path>) -> (config::Settings, Option<String>) {
    let loaded = match path {
        Some(p) => config::Settings::load_from(Some(p)),
        None => config::Settings::load(),
    };
    match loaded {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("earshot: invalid config, using defaults: {msg}");
                (config::Settings::default(), Some(format!("invalid config: {msg}")))
            } else {
                (s, None)
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("earshot: failed to load config, using defaults: {e}");
            (config::Settings::default(), Some(format!("failed to load config: {e}")))
        }
    }
}
