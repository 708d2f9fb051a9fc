//! Playback controller: the state machine between the playlist and the
//! audio handle.
//!
//! The controller is generic over [`AudioOutput`] so the state machine can be
//! driven without a sound card; the real handle lives in `crate::audio`.

mod controller;
mod types;

pub use controller::PlaybackController;
pub use types::*;
