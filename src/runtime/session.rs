use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::app::App;
use crate::library::{ListingSource, PlaylistLoader};
use crate::mpris::ControlCmd;
use crate::player::{AudioEvent, AudioOutput, PlaybackController, PlayerError, PlayerEvent};
use crate::ui::UiAction;

use super::folders::{FolderLoaded, spawn_folder_load};

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the event loop drives: the UI model, the playback controller
/// and the folder loader, plus the channels feeding them.
pub struct Session<O: AudioOutput> {
    pub app: App,
    pub controller: PlaybackController<O>,
    loader: PlaylistLoader,
    source: Arc<dyn ListingSource>,
    audio_events: Receiver<AudioEvent>,
    player_events: Receiver<PlayerEvent>,
    folders_tx: Sender<FolderLoaded>,
    folders_rx: Receiver<FolderLoaded>,
    volume_step: u8,
    scrub_seconds: i64,
}

impl<O: AudioOutput> Session<O> {
    pub fn new(
        app: App,
        mut controller: PlaybackController<O>,
        loader: PlaylistLoader,
        source: Arc<dyn ListingSource>,
        audio_events: Receiver<AudioEvent>,
        volume_step: u8,
        scrub_seconds: u64,
    ) -> Self {
        let player_events = controller.subscribe();
        let (folders_tx, folders_rx) = mpsc::channel();
        Self {
            app,
            controller,
            loader,
            source,
            audio_events,
            player_events,
            folders_tx,
            folders_rx,
            volume_step,
            scrub_seconds: i64::try_from(scrub_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Start fetching `folder`; the result is applied by [`Session::drain`].
    ///
    /// With `autoload`, the first track is loaded (not played) once the
    /// list arrives.
    pub fn select_folder(&mut self, folder: &str, autoload: bool) {
        let ticket = self.loader.begin(folder);
        self.app.start_loading(ticket.folder());
        spawn_folder_load(
            self.source.clone(),
            ticket,
            self.loader.suffix().to_string(),
            autoload,
            self.folders_tx.clone(),
        );
    }

    /// Apply whatever background threads reported since the last call.
    ///
    /// Returns true when the track or play state changed.
    pub fn drain(&mut self) -> bool {
        while let Ok(done) = self.folders_rx.try_recv() {
            self.finish_folder(done);
        }

        while let Ok(event) = self.audio_events.try_recv() {
            let result = self.controller.handle_audio_event(event);
            log_player_error(result);
        }

        let mut changed = false;
        while let Ok(event) = self.player_events.try_recv() {
            changed |= !matches!(
                event,
                PlayerEvent::PositionUpdated { .. } | PlayerEvent::VolumeChanged { .. }
            );
            self.app.apply_player_event(&event);
        }
        changed
    }

    fn finish_folder(&mut self, done: FolderLoaded) {
        let FolderLoaded {
            ticket,
            tracks,
            autoload,
        } = done;
        let Some(tracks) = self.loader.finish(ticket, tracks).cloned() else {
            return;
        };

        self.controller.replace_tracks(tracks);
        self.app.show_tracks(self.controller.tracks());
        if autoload && !self.controller.tracks().is_empty() {
            log_player_error(self.controller.load(0));
        }
    }

    pub fn dispatch(&mut self, action: UiAction) -> Flow {
        match action {
            UiAction::PlayRow(index) => self.play_row(index),
            UiAction::PlaySelected => {
                if self.app.has_tracks() {
                    self.play_row(self.app.selected);
                }
            }
            UiAction::SelectNext => self.app.next(),
            UiAction::SelectPrev => self.app.prev(),
            UiAction::TogglePlayPause => self.controller.toggle_play_pause(),
            UiAction::Next => {
                self.app.follow_playback_on();
                log_player_error(self.controller.next());
            }
            UiAction::Previous => {
                self.app.follow_playback_on();
                log_player_error(self.controller.previous());
            }
            UiAction::SeekTo(fraction) => self.controller.seek_to(fraction),
            UiAction::SeekBy(seconds) => self.controller.seek_by(seconds),
            UiAction::SetVolume(percent) => self.controller.set_volume(percent),
            UiAction::VolumeUp => {
                let v = self.controller.status().volume;
                self.controller.set_volume(v.saturating_add(self.volume_step));
            }
            UiAction::VolumeDown => {
                let v = self.controller.status().volume;
                self.controller.set_volume(v.saturating_sub(self.volume_step));
            }
            UiAction::SelectFolder(folder) => {
                self.app.close_menu();
                self.select_folder(&folder, false);
            }
            UiAction::FolderCursorNext => self.app.folder_cursor_next(),
            UiAction::FolderCursorPrev => self.app.folder_cursor_prev(),
            UiAction::ChooseFolderAtCursor => {
                if let Some(card) = self.app.folder_at_cursor() {
                    let folder = card.id.clone();
                    return self.dispatch(UiAction::SelectFolder(folder));
                }
            }
            UiAction::OpenMenu => self.app.open_menu(),
            UiAction::CloseMenu => self.app.close_menu(),
            UiAction::ToggleMenu => self.app.toggle_menu(),
            UiAction::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Handle a request from desktop media controls.
    pub fn control(&mut self, cmd: ControlCmd) -> Flow {
        let playing = self.controller.status().state.is_playing();
        match cmd {
            ControlCmd::Quit => return Flow::Quit,
            ControlCmd::Play if !playing => self.controller.toggle_play_pause(),
            ControlCmd::Pause if playing => self.controller.toggle_play_pause(),
            ControlCmd::Play | ControlCmd::Pause => {}
            ControlCmd::PlayPause => self.controller.toggle_play_pause(),
            ControlCmd::Stop => {
                if playing {
                    self.controller.toggle_play_pause();
                }
                self.controller.seek_to(0.0);
            }
            ControlCmd::Next => return self.dispatch(UiAction::Next),
            ControlCmd::Prev => return self.dispatch(UiAction::Previous),
        }
        Flow::Continue
    }

    fn play_row(&mut self, index: usize) {
        if index < self.app.playlist.len() {
            self.app.selected = index;
            self.app.follow_playback_on();
        }
        log_player_error(self.controller.load_and_play(index));
    }

    pub fn scrub_seconds(&self) -> i64 {
        self.scrub_seconds
    }
}

fn log_player_error(result: Result<(), PlayerError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "playback request ignored");
    }
}
