//! Commands understood by the audio thread.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::player::LoadToken;

use super::fetch::FetchError;

#[derive(Debug)]
pub enum AudioCmd {
    /// Download and prepare the track at `url`; playback does not start.
    Load { token: LoadToken, url: Url },
    /// Start or resume playback (deferred until the download finished).
    Play,
    Pause,
    /// Drop the current track and any pending download.
    Stop,
    /// Jump to an absolute position in the current track.
    Seek(Duration),
    /// Linear volume in `0.0..=1.0`.
    SetVolume(f32),
    /// A download started by `Load` finished.
    Fetched {
        token: LoadToken,
        result: Result<Arc<[u8]>, FetchError>,
    },
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}
