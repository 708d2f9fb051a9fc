use std::time::Duration;

use crate::player::{PlaybackState, PlayerEvent};
use crate::time_format::format_duration;

/// What the now-playing area shows, kept in sync from `PlayerEvent`s.
#[derive(Clone, Debug, PartialEq)]
pub struct NowPlaying {
    pub index: Option<usize>,
    pub song: Option<String>,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub state: PlaybackState,
    pub volume: u8,
}

impl NowPlaying {
    pub fn new(volume: u8) -> Self {
        Self {
            index: None,
            song: None,
            position: Duration::ZERO,
            duration: None,
            state: PlaybackState::Empty,
            volume,
        }
    }

    pub fn apply(&mut self, event: &PlayerEvent) {
        match event {
            PlayerEvent::TrackChanged { index, name } => {
                self.index = Some(*index);
                self.song = Some(name.clone());
                self.position = Duration::ZERO;
                self.duration = None;
            }
            PlayerEvent::InfoRefreshed {
                name,
                position,
                duration,
            } => {
                self.song = Some(name.clone());
                self.position = *position;
                self.duration = Some(*duration);
            }
            PlayerEvent::PositionUpdated { position, duration } => {
                self.position = *position;
                self.duration = *duration;
            }
            PlayerEvent::PlayStateChanged { state } => self.state = *state,
            PlayerEvent::VolumeChanged { percent } => self.volume = *percent,
            PlayerEvent::Cleared => *self = Self::new(self.volume),
        }
    }

    /// `elapsed / total`, with an unknown total shown as `0:00`.
    pub fn time_text(&self) -> String {
        format!(
            "{} / {}",
            format_duration(self.position),
            format_duration(self.duration.unwrap_or_default())
        )
    }

    /// Progress in percent; 0 while the duration is unknown.
    pub fn progress_percent(&self) -> f64 {
        match self.duration.filter(|d| !d.is_zero()) {
            Some(d) => (self.position.as_secs_f64() / d.as_secs_f64() * 100.0).min(100.0),
            None => 0.0,
        }
    }

    /// Icon for the play/pause button: shows what a press will do.
    pub fn play_icon(&self) -> &'static str {
        if self.state.is_playing() { "⏸" } else { "▶" }
    }

    pub fn song_text(&self) -> &str {
        self.song.as_deref().unwrap_or("")
    }
}
