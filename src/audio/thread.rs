use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;
use crate::player::{AudioEvent, AudioEventKind, LoadToken};

use super::fetch::{probe_duration, spawn_fetch};
use super::sink::create_sink_at;
use super::types::AudioCmd;

/// The track the thread is currently responsible for.
struct Current {
    token: LoadToken,
    bytes: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    /// Set once `Ended` was reported so it is sent exactly once.
    ended: bool,
}

/// Everything the audio thread mutates, so the command handlers can be
/// plain methods instead of free functions with a dozen `&mut` params.
struct Engine {
    stream: OutputStream,
    agent: ureq::Agent,
    settings: AudioSettings,
    self_tx: Sender<AudioCmd>,
    events: Sender<AudioEvent>,

    current: Option<Current>,
    /// Whether playback was requested; may arrive before the bytes do.
    want_playing: bool,
    volume: f32,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Engine {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn emit(&self, token: LoadToken, kind: AudioEventKind) {
        let _ = self.events.send(AudioEvent { token, kind });
    }

    fn stop(&mut self) {
        if let Some(sink) = self.current.take().and_then(|c| c.sink) {
            sink.stop();
        }
        self.want_playing = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn load(&mut self, token: LoadToken, url: url::Url) {
        self.stop();
        tracing::debug!(%url, ?token, "loading track");
        self.current = Some(Current {
            token,
            bytes: None,
            sink: None,
            ended: false,
        });
        spawn_fetch(
            self.agent.clone(),
            token,
            url,
            self.settings.max_track_bytes,
            self.self_tx.clone(),
        );
    }

    fn fetched(&mut self, token: LoadToken, bytes: Arc<[u8]>) {
        let Some(current) = self.current.as_mut().filter(|c| c.token == token) else {
            // A newer load (or a stop) happened while downloading.
            return;
        };

        match create_sink_at(&self.stream, &bytes, Duration::ZERO, self.volume) {
            Ok((sink, decoder_total)) => {
                let duration = probe_duration(&bytes).or(decoder_total);
                if self.want_playing {
                    sink.play();
                    self.started_at = Some(Instant::now());
                }
                current.sink = Some(sink);
                current.bytes = Some(bytes);
                match duration {
                    Some(duration) => {
                        self.emit(token, AudioEventKind::MetadataLoaded { duration })
                    }
                    None => tracing::info!(?token, "track duration unknown"),
                }
            }
            Err(e) => tracing::warn!(?token, error = %e, "failed to decode track"),
        }
    }

    fn play(&mut self) {
        self.want_playing = true;
        if let Some(sink) = self.current.as_ref().and_then(|c| c.sink.as_ref()) {
            if sink.is_paused() {
                sink.play();
                self.started_at = Some(Instant::now());
            }
        }
    }

    fn pause(&mut self) {
        self.want_playing = false;
        if let Some(sink) = self.current.as_ref().and_then(|c| c.sink.as_ref()) {
            sink.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    fn seek(&mut self, position: Duration) {
        // Rebuild the current sink and skip into the track.
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let Some(bytes) = current.bytes.clone() else {
            return;
        };

        match create_sink_at(&self.stream, &bytes, position, self.volume) {
            Ok((new_sink, _)) => {
                if let Some(old) = current.sink.take() {
                    old.stop();
                }
                if self.want_playing {
                    new_sink.play();
                    self.started_at = Some(Instant::now());
                } else {
                    self.started_at = None;
                }
                current.sink = Some(new_sink);
                current.ended = false;
                self.accumulated = position;
            }
            Err(e) => tracing::warn!(error = %e, "failed to seek"),
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = self.current.as_ref().and_then(|c| c.sink.as_ref()) {
            sink.set_volume(self.volume);
        }
    }

    /// Periodic check: report the position, or the end of the track.
    fn tick(&mut self) {
        if !self.want_playing {
            return;
        }
        let position = self.elapsed();
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let Some(sink) = current.sink.as_ref() else {
            return;
        };

        let token = current.token;
        if sink.empty() {
            if !current.ended {
                current.ended = true;
                self.started_at = None;
                self.emit(token, AudioEventKind::Ended);
            }
        } else {
            self.emit(token, AudioEventKind::TimeUpdate { position });
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(sink) = self.current.as_ref().and_then(|c| c.sink.as_ref()) {
            if !sink.is_paused() {
                // Fade out gently before stopping.
                fade_out_sink(sink, self.volume, fade_out_ms);
            }
            sink.stop();
        }
        self.current = None;
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    self_tx: Sender<AudioCmd>,
    events: Sender<AudioEvent>,
    agent: ureq::Agent,
    settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "no audio output device, playback disabled");
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let mut engine = Engine {
            stream,
            agent,
            volume: f32::from(settings.initial_volume.min(100)) / 100.0,
            settings,
            self_tx,
            events,
            current: None,
            want_playing: false,
            started_at: None,
            accumulated: Duration::ZERO,
        };

        let mut next_tick = Instant::now() + tick;
        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            match rx.recv_timeout(timeout) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { token, url } => engine.load(token, url),
                    AudioCmd::Fetched {
                        token,
                        result: Ok(bytes),
                    } => engine.fetched(token, bytes),
                    // Already logged by the fetch worker; the handle stays silent.
                    AudioCmd::Fetched { result: Err(_), .. } => {}
                    AudioCmd::Play => engine.play(),
                    AudioCmd::Pause => engine.pause(),
                    AudioCmd::Stop => engine.stop(),
                    AudioCmd::Seek(position) => engine.seek(position),
                    AudioCmd::SetVolume(volume) => engine.set_volume(volume),
                    AudioCmd::Quit { fade_out_ms } => {
                        engine.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if Instant::now() >= next_tick {
                engine.tick();
                next_tick = Instant::now() + tick;
            }
        }
    })
}
