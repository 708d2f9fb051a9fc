use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::library::{Track, TrackList};

use super::types::{
    AudioEvent, AudioEventKind, AudioOutput, LoadToken, PlaybackState, PlaybackStatus, PlayerError,
    PlayerEvent,
};

/// Owns the track list, the playback status and the audio handle.
///
/// Nothing else touches the output; the UI learns about changes through
/// [`PlaybackController::subscribe`].
pub struct PlaybackController<O: AudioOutput> {
    output: O,
    tracks: TrackList,
    status: PlaybackStatus,
    token: LoadToken,
    subscribers: Vec<Sender<PlayerEvent>>,
}

impl<O: AudioOutput> PlaybackController<O> {
    pub fn new(mut output: O, volume: u8) -> Self {
        let volume = volume.min(100);
        output.set_volume(f32::from(volume) / 100.0);
        Self {
            output,
            tracks: TrackList::default(),
            status: PlaybackStatus {
                volume,
                ..PlaybackStatus::default()
            },
            token: LoadToken::default(),
            subscribers: Vec::new(),
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.status.index.and_then(|i| self.tracks.get(i))
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Swap in a new folder's tracks. Playback stops and nothing is loaded.
    pub fn replace_tracks(&mut self, tracks: TrackList) {
        self.output.stop();
        // Invalidate in-flight events from the old track.
        self.token = self.token.next();
        self.tracks = tracks;
        self.status = PlaybackStatus {
            volume: self.status.volume,
            ..PlaybackStatus::default()
        };
        self.emit(PlayerEvent::Cleared);
    }

    /// Point the audio handle at track `index` without starting it.
    pub fn load(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.tracks.len();
        let Some(track) = self.tracks.get(index) else {
            return Err(PlayerError::IndexOutOfRange { index, len });
        };

        self.token = self.token.next();
        self.output.load(self.token, track);
        let name = track.name.clone();
        tracing::debug!(index, name, "track loaded");

        self.status.index = Some(index);
        self.status.state = PlaybackState::Loaded;
        self.status.position = Duration::ZERO;
        self.status.duration = None;

        self.emit(PlayerEvent::TrackChanged { index, name });
        Ok(())
    }

    pub fn load_and_play(&mut self, index: usize) -> Result<(), PlayerError> {
        self.load(index)?;
        self.output.play();
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        match self.status.state {
            PlaybackState::Playing => {
                self.output.pause();
                self.set_state(PlaybackState::Paused);
            }
            PlaybackState::Paused | PlaybackState::Loaded => {
                self.output.play();
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Empty => self.set_state(PlaybackState::Empty),
        }
    }

    /// Play the following track, wrapping to the first after the last.
    pub fn next(&mut self) -> Result<(), PlayerError> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlayerError::EmptyPlaylist);
        }
        let index = match self.status.index {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.load_and_play(index)
    }

    /// Play the preceding track, wrapping to the last before the first.
    pub fn previous(&mut self) -> Result<(), PlayerError> {
        let len = self.tracks.len();
        if len == 0 {
            return Err(PlayerError::EmptyPlaylist);
        }
        let index = match self.status.index {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.load_and_play(index)
    }

    /// Jump to `fraction` of the track. Does nothing while the duration is unknown.
    pub fn seek_to(&mut self, fraction: f64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(duration.mul_f64(fraction));
    }

    /// Scrub by `seconds` (negative goes back), clamped to the track bounds.
    pub fn seek_by(&mut self, seconds: i64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        let delta = Duration::from_secs(seconds.unsigned_abs());
        let target = if seconds < 0 {
            self.status.position.saturating_sub(delta)
        } else {
            self.status.position.saturating_add(delta)
        };
        self.seek(target.min(duration));
    }

    /// Set the volume in percent (clamped to 100).
    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        tracing::debug!(percent, "volume set");
        self.output.set_volume(f32::from(percent) / 100.0);
        self.status.volume = percent;
        self.emit(PlayerEvent::VolumeChanged { percent });
    }

    /// Feed a report from the audio handle into the state machine.
    pub fn handle_audio_event(&mut self, event: AudioEvent) -> Result<(), PlayerError> {
        if event.token != self.token || self.status.index.is_none() {
            return Ok(());
        }

        match event.kind {
            AudioEventKind::MetadataLoaded { duration } => {
                self.status.duration = Some(duration);
                let name = self
                    .current_track()
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                self.emit(PlayerEvent::InfoRefreshed {
                    name,
                    position: self.status.position,
                    duration,
                });
            }
            AudioEventKind::TimeUpdate { position } => {
                self.status.position = match self.status.duration {
                    Some(d) => position.min(d),
                    None => position,
                };
                self.emit(PlayerEvent::PositionUpdated {
                    position: self.status.position,
                    duration: self.status.duration,
                });
            }
            AudioEventKind::Ended => {
                tracing::debug!(index = ?self.status.index, "track ended, advancing");
                self.next()?;
            }
        }
        Ok(())
    }

    fn known_duration(&self) -> Option<Duration> {
        self.status.duration.filter(|d| !d.is_zero())
    }

    fn seek(&mut self, position: Duration) {
        self.output.seek(position);
        self.status.position = position;
        self.emit(PlayerEvent::PositionUpdated {
            position,
            duration: self.status.duration,
        });
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.status.state = state;
        self.emit(PlayerEvent::PlayStateChanged { state });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
