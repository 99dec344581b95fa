//! Utilities for creating `rodio` sinks from downloaded preview bytes.
//!
//! The helper here encapsulates decoding an in-memory clip and preparing a
//! paused `Sink` at the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::ResourceError;

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the clip's total duration when the container reports one.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    bytes: &Arc<[u8]>,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), ResourceError> {
    let decoder = Decoder::new(Cursor::new(Arc::clone(bytes)))
        .map_err(|e| ResourceError::Decode(e.to_string()))?;
    let total = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
