//! Track downloads and duration probing.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use url::Url;

use crate::player::LoadToken;

use super::types::AudioCmd;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] ureq::Error),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("failed to read body: {0}")]
    Body(#[source] ureq::Error),
}

/// Download `url` on a worker thread and hand the bytes back to the audio thread.
pub(super) fn spawn_fetch(
    agent: ureq::Agent,
    token: LoadToken,
    url: Url,
    max_bytes: u64,
    tx: Sender<AudioCmd>,
) {
    thread::spawn(move || {
        let result = download(&agent, &url, max_bytes);
        match &result {
            Ok(bytes) => tracing::debug!(%url, bytes = bytes.len(), "track downloaded"),
            Err(e) => tracing::warn!(%url, error = %e, "track download failed"),
        }
        let _ = tx.send(AudioCmd::Fetched { token, result });
    });
}

fn download(agent: &ureq::Agent, url: &Url, max_bytes: u64) -> Result<Arc<[u8]>, FetchError> {
    let mut resp = agent.get(url.as_str()).call().map_err(|e| match e {
        ureq::Error::StatusCode(code) => FetchError::Status(code),
        other => FetchError::Transport(other),
    })?;

    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status().as_u16()));
    }

    let bytes = resp
        .body_mut()
        .with_config()
        .limit(max_bytes)
        .read_to_vec()
        .map_err(FetchError::Body)?;
    Ok(Arc::from(bytes))
}

/// Read the track length from the container/stream headers.
pub(super) fn probe_duration(bytes: &Arc<[u8]>) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes.clone()))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}
