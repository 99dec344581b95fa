use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::debug;

use super::thread::AudioCmd;
use super::types::ResourceError;

/// Download a preview clip off the audio thread and post it back tagged with
/// the generation it was requested for.
pub(super) fn spawn_fetch(
    client: reqwest::blocking::Client,
    generation: u64,
    url: String,
    tx: Sender<AudioCmd>,
) {
    thread::spawn(move || {
        let result = fetch_bytes(&client, &url).map_err(|e| e.to_string());
        debug!(generation, ok = result.is_ok(), "preview fetch finished");
        let _ = tx.send(AudioCmd::Fetched { generation, result });
    });
}

fn fetch_bytes(client: &reqwest::blocking::Client, url: &str) -> Result<Arc<[u8]>, ResourceError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|e| ResourceError::Fetch(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ResourceError::Fetch(format!("HTTP {}", status.as_u16())));
    }
    let bytes = resp
        .bytes()
        .map_err(|e| ResourceError::Fetch(e.to_string()))?;
    Ok(Arc::from(bytes.as_ref()))
}
