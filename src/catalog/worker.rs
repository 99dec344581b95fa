//! Background catalog queries.
//!
//! Searches block on the network, so they run on short-lived threads and
//! report back over a channel the event loop drains.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use super::client::CatalogSource;
use super::model::Track;

/// Which list a catalog reply is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget {
    Featured,
    /// A user search, tagged with the shell's search generation.
    Search(u64),
}

#[derive(Debug)]
pub struct CatalogReply {
    pub target: ReplyTarget,
    pub tracks: Vec<Track>,
}

/// Run `query` on a worker thread and send the reply to `tx`.
pub fn spawn_search(
    source: Arc<dyn CatalogSource>,
    target: ReplyTarget,
    query: String,
    limit: usize,
    tx: Sender<CatalogReply>,
) {
    thread::spawn(move || {
        let tracks = source.search(&query, limit);
        if tx.send(CatalogReply { target, tracks }).is_err() {
            debug!(?target, "catalog reply dropped, receiver is gone");
        }
    });
}
