use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::{AudioSettings, ServerSettings};
use crate::library::{Track, http_agent};
use crate::player::{AudioEvent, AudioOutput, LoadToken};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// The rodio-backed audio handle. Commands go to a dedicated thread;
/// progress comes back on the receiver returned by [`AudioPlayer::new`].
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(
        audio_settings: AudioSettings,
        server_settings: &ServerSettings,
    ) -> (Self, Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (events_tx, events_rx) = mpsc::channel::<AudioEvent>();
        let agent = http_agent(Duration::from_millis(server_settings.timeout_ms));

        let audio_handle = spawn_audio_thread(rx, tx.clone(), events_tx, agent, audio_settings);

        (
            Self {
                tx,
                join: Mutex::new(Some(audio_handle)),
            },
            events_rx,
        )
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        // The thread holds its own sender for download results, so it
        // never sees a disconnect; tell it to go away explicitly.
        let _ = self.send(AudioCmd::Quit { fade_out_ms: 0 });
    }
}

impl AudioOutput for AudioPlayer {
    fn load(&mut self, token: LoadToken, track: &Track) {
        let _ = self.send(AudioCmd::Load {
            token,
            url: track.url.clone(),
        });
    }

    fn play(&mut self) {
        let _ = self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        let _ = self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        let _ = self.send(AudioCmd::Stop);
    }

    fn seek(&mut self, position: Duration) {
        let _ = self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        let _ = self.send(AudioCmd::SetVolume(volume));
    }
}
