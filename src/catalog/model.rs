use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::Value;

/// A catalog track with a playable preview clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub artist_name: String,
    pub album_name: String,
    pub artwork_url: String,
    pub preview_url: String,
    /// Nominal duration reported by the catalog; 0 when it was missing.
    pub duration_millis: u64,
}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        make_display(&self.title, &self.artist_name)
    }

    /// Whether `other` refers to the same playable clip.
    pub fn same_clip(&self, other: &Track) -> bool {
        self.id == other.id && self.preview_url == other.preview_url
    }
}

fn make_display(title: &str, artist: &str) -> String {
    let title = if title.trim().is_empty() {
        "Untitled"
    } else {
        title.trim()
    };
    match artist.trim() {
        "" => title.to_string(),
        a => format!("{} - {}", a, title),
    }
}

/// Build a `Track` from one entry of the catalog's `results` array.
///
/// Only `previewUrl` is load-bearing. A missing or non-numeric `trackId` is
/// replaced by an id derived from the preview URL; every other field falls
/// back to an empty value when it is missing or has the wrong type.
pub(crate) fn track_from_value(item: &Value) -> Option<Track> {
    let preview_url = item
        .get("previewUrl")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();
    let id = item
        .get("trackId")
        .and_then(Value::as_i64)
        .unwrap_or_else(|| fallback_id(&preview_url));

    Some(Track {
        id,
        title: string_field(item, "trackName"),
        artist_name: string_field(item, "artistName"),
        album_name: string_field(item, "collectionName"),
        artwork_url: string_field(item, "artworkUrl100"),
        preview_url,
        duration_millis: millis_field(item, "trackTimeMillis"),
    })
}

/// Stable negative id for records the catalog sent without one. Real
/// catalog ids are positive, so the two never collide.
fn fallback_id(preview_url: &str) -> i64 {
    let mut hasher = DefaultHasher::new();
    preview_url.hash(&mut hasher);
    -((hasher.finish() >> 1) as i64) - 1
}

fn string_field(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn millis_field(item: &Value, key: &str) -> u64 {
    match item.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Extract every playable track from a raw catalog response body.
pub(crate) fn tracks_from_response(body: &Value) -> Vec<Track> {
    body.get("results")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(track_from_value).collect())
        .unwrap_or_default()
}
