//! Track catalog: the remote search service and its track model.
//!
//! `client` talks to the search endpoint, `model` turns its loosely typed
//! JSON into `Track` values and `worker` runs queries off the UI thread.

mod client;
mod model;
mod worker;

pub use client::{CatalogError, CatalogSource, ItunesCatalog};
pub use model::Track;
pub use worker::{CatalogReply, ReplyTarget, spawn_search};
