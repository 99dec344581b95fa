use std::sync::Arc;
use std::sync::mpsc::Sender;

use tracing::info;

use crate::app::App;
use crate::catalog::{CatalogReply, CatalogSource, ReplyTarget, spawn_search};
use crate::config;

/// Kick off the featured list and, when given, the search from the command line.
pub fn request_initial_tracks(
    app: &mut App,
    source: &Arc<dyn CatalogSource>,
    tx: &Sender<CatalogReply>,
    settings: &config::CatalogSettings,
    initial_query: Option<&str>,
) {
    app.begin_featured();
    spawn_search(
        Arc::clone(source),
        ReplyTarget::Featured,
        settings.featured_query.clone(),
        settings.featured_limit,
        tx.clone(),
    );

    if let Some(query) = initial_query {
        if let Some(req) = app.begin_search(query) {
            info!(query = %req.query, "initial search");
            spawn_search(
                Arc::clone(source),
                ReplyTarget::Search(req.generation),
                req.query,
                settings.search_limit,
                tx.clone(),
            );
        }
    }
}
