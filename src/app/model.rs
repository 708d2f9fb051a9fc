//! Application model: what the terminal UI shows and where the cursor is.
//!
//! `App` never touches the audio handle. It is fed with track lists from the
//! loader and `PlayerEvent`s from the controller, and the draw pass fills
//! its `bindings` so clicks can be resolved afterwards.

use crate::config::FolderCard;
use crate::library::TrackList;
use crate::player::PlayerEvent;
use crate::ui::{Bindings, NowPlaying, PlaylistView};

/// The main application model.
pub struct App {
    pub playlist: PlaylistView,
    pub now_playing: NowPlaying,
    pub selected: usize,

    pub folders: Vec<FolderCard>,
    pub folder_cursor: usize,
    pub menu_open: bool,
    /// Folder whose listing is being fetched.
    pub loading: Option<String>,

    /// Cursor jumps to the playing track when playback moves on its own.
    pub follow_playback: bool,
    pub bindings: Bindings,
}

impl App {
    pub fn new(folders: Vec<FolderCard>, row_label: &str, volume: u8) -> Self {
        Self {
            playlist: PlaylistView::new(row_label),
            now_playing: NowPlaying::new(volume),
            selected: 0,
            folders,
            folder_cursor: 0,
            menu_open: false,
            loading: None,
            follow_playback: true,
            bindings: Bindings::default(),
        }
    }

    /// Return true if the current folder has any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn current_folder(&self) -> Option<&str> {
        self.playlist.folder()
    }

    /// Mark `folder` as being fetched and point the menu cursor at it.
    pub fn start_loading(&mut self, folder: &str) {
        self.loading = Some(folder.to_string());
        if let Some(pos) = self.folders.iter().position(|f| f.id == folder) {
            self.folder_cursor = pos;
        }
    }

    /// Show a freshly loaded folder.
    pub fn show_tracks(&mut self, tracks: &TrackList) {
        if self.loading.as_deref() == tracks.folder() {
            self.loading = None;
        }
        self.playlist.render(tracks);
        self.selected = 0;
        self.follow_playback = true;
    }

    pub fn apply_player_event(&mut self, event: &PlayerEvent) {
        self.now_playing.apply(event);
        if let PlayerEvent::TrackChanged { index, .. } = event {
            if self.follow_playback && *index < self.playlist.len() {
                self.selected = *index;
            }
        }
    }

    /// Move selection to the next row, wrapping around.
    pub fn next(&mut self) {
        let n = self.playlist.len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
        self.follow_playback = false;
    }

    /// Move selection to the previous row, wrapping around.
    pub fn prev(&mut self) {
        let n = self.playlist.len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
        self.follow_playback = false;
    }

    /// Enable following playback (cursor follows currently playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn open_menu(&mut self) {
        self.menu_open = true;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn folder_cursor_next(&mut self) {
        let n = self.folders.len();
        if n > 0 {
            self.folder_cursor = (self.folder_cursor + 1) % n;
        }
    }

    pub fn folder_cursor_prev(&mut self) {
        let n = self.folders.len();
        if n > 0 {
            self.folder_cursor = (self.folder_cursor + n - 1) % n;
        }
    }

    pub fn folder_at_cursor(&self) -> Option<&FolderCard> {
        self.folders.get(self.folder_cursor)
    }
}
