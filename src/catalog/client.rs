use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CatalogSettings;

use super::model::{Track, tracks_from_response};

/// Largest page size the search endpoint accepts.
pub const MAX_LIMIT: usize = 200;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {0}")]
    Status(u16),

    #[error("catalog response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can answer a free-text track query.
///
/// Implementations never fail: errors are logged and produce an empty list.
pub trait CatalogSource: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> Vec<Track>;
}

/// Client for the iTunes Search API.
pub struct ItunesCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
    country: Option<String>,
}

impl ItunesCatalog {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            country: settings
                .country
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }

    /// Run one query and surface every failure to the caller.
    pub fn try_search(&self, query: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        let limit = clamp_limit(limit).to_string();
        let mut params = vec![
            ("term", query),
            ("entity", "song"),
            ("limit", limit.as_str()),
        ];
        if let Some(country) = self.country.as_deref() {
            params.push(("country", country));
        }

        let resp = self.client.get(&self.base_url).query(&params).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body: Value = serde_json::from_str(&resp.text()?)?;
        Ok(tracks_from_response(&body))
    }
}

impl CatalogSource for ItunesCatalog {
    fn search(&self, query: &str, limit: usize) -> Vec<Track> {
        match self.try_search(query, limit) {
            Ok(tracks) => {
                debug!(query, count = tracks.len(), "catalog search finished");
                tracks
            }
            Err(e) => {
                warn!(query, error = %e, "catalog search failed");
                Vec::new()
            }
        }
    }
}

pub(crate) fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIMIT)
}
