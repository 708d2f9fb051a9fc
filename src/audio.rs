//! Audio subsystem: the rodio-backed audio handle.
//!
//! `AudioPlayer` forwards commands to a dedicated audio thread which
//! downloads tracks, owns the output stream and sink, and reports
//! metadata, position and end-of-track back as `AudioEvent`s.

mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
