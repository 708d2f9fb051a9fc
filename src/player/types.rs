//! Playback state, events and the audio handle seam.

use std::time::Duration;

use crate::library::Track;

/// Where the single audio handle currently stands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded.
    #[default]
    Empty,
    /// A track is loaded but has not been started.
    Loaded,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

/// Snapshot of the controller's playback state.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackStatus {
    pub index: Option<usize>,
    pub state: PlaybackState,
    pub position: Duration,
    /// Known only after the audio handle reported metadata.
    pub duration: Option<Duration>,
    /// 0-100.
    pub volume: u8,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self {
            index: None,
            state: PlaybackState::Empty,
            position: Duration::ZERO,
            duration: None,
            volume: 100,
        }
    }
}

/// Identifies one `load` on the audio handle. Events carrying an older
/// token belong to a track that has been replaced and are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LoadToken(pub u64);

impl LoadToken {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioEventKind {
    /// The track's duration is now known.
    MetadataLoaded { duration: Duration },
    /// Periodic position report while playing.
    TimeUpdate { position: Duration },
    /// Playback reached the end of the track.
    Ended,
}

/// Report from the audio handle back to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioEvent {
    pub token: LoadToken,
    pub kind: AudioEventKind,
}

/// Notifications published by the controller to its subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A new track was loaded; its name is known, its duration is not yet.
    TrackChanged { index: usize, name: String },
    /// Metadata arrived for the current track.
    InfoRefreshed {
        name: String,
        position: Duration,
        duration: Duration,
    },
    PositionUpdated {
        position: Duration,
        duration: Option<Duration>,
    },
    PlayStateChanged { state: PlaybackState },
    VolumeChanged { percent: u8 },
    /// The track list was replaced and nothing is loaded.
    Cleared,
}

/// The single audio handle driven by the controller.
///
/// Implementations report progress through [`AudioEvent`]s tagged with the
/// token passed to `load`.
pub trait AudioOutput {
    /// Point the handle at `track`. Does not start playback.
    fn load(&mut self, token: LoadToken, track: &Track);
    fn play(&mut self);
    fn pause(&mut self);
    /// Drop the current track.
    fn stop(&mut self);
    fn seek(&mut self, position: Duration);
    /// `volume` is in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerError {
    #[error("playlist is empty")]
    EmptyPlaylist,
    #[error("track index {index} out of range for {len} tracks")]
    IndexOutOfRange { index: usize, len: usize },
}
