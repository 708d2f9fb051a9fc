//! Utilities for creating `rodio` sinks from downloaded track bytes.
//!
//! The helper here decodes an in-memory track and prepares a paused `Sink`
//! at the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
///
/// Also returns the decoder's own idea of the total duration, which is
/// only a fallback when the headers could not be probed.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &Arc<[u8]>,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), DecoderError> {
    let decoder = Decoder::new(Cursor::new(bytes.clone()))?;
    let total = decoder.total_duration();
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
