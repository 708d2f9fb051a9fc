use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};

use super::event_loop::key_action;
use super::session::{Flow, Session};
use crate::app::App;
use crate::config::{ControlsSettings, FolderCard, UiSettings};
use crate::library::PlaylistLoader;
use crate::library::tests::{FakeSource, index_page};
use crate::mpris::ControlCmd;
use crate::player::tests::{Call, FakeOutput};
use crate::player::{AudioEvent, AudioEventKind, PlaybackController, PlaybackState};
use crate::ui::{self, Target, UiAction};

fn card(id: &str) -> FolderCard {
    FolderCard {
        id: id.to_string(),
        title: String::new(),
        description: String::new(),
    }
}

fn source() -> FakeSource {
    FakeSource::new()
        .with_page(
            "Happy_Hits",
            &index_page(&["a.mp3", "b.mp3", "cover.jpg", "c.mp3"]),
        )
        .with_page("Chill", &index_page(&["x.mp3", "y.mp3"]))
        .with_status("Broken", 500)
}

fn session() -> (Session<FakeOutput>, Sender<AudioEvent>) {
    let (audio_tx, audio_rx) = mpsc::channel();
    let app = App::new(
        vec![card("Happy_Hits"), card("Chill"), card("Broken")],
        "Unknown artist",
        80,
    );
    let session = Session::new(
        app,
        PlaybackController::new(FakeOutput::default(), 80),
        PlaylistLoader::new(".mp3"),
        Arc::new(source()),
        audio_rx,
        10,
        5,
    );
    (session, audio_tx)
}

/// Drain until no folder load is outstanding.
fn settle(session: &mut Session<FakeOutput>) {
    for _ in 0..500 {
        session.drain();
        if session.app.loading.is_none() {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("folder load never finished");
}

fn ended(session: &Session<FakeOutput>) -> AudioEvent {
    AudioEvent {
        token: session.controller.output().last_load().unwrap(),
        kind: AudioEventKind::Ended,
    }
}

fn render(session: &mut Session<FakeOutput>) {
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal
        .draw(|f| {
            ui::draw(
                f,
                &mut session.app,
                &UiSettings::default(),
                &ControlsSettings::default(),
            )
        })
        .unwrap();
}

#[test]
fn startup_loads_first_track_without_playing() {
    let (mut s, _audio) = session();
    s.select_folder("Happy_Hits", true);
    assert_eq!(s.app.loading.as_deref(), Some("Happy_Hits"));
    settle(&mut s);

    assert_eq!(s.app.playlist.len(), 3);
    assert_eq!(s.controller.status().index, Some(0));
    assert_eq!(s.controller.status().state, PlaybackState::Loaded);
    assert!(!s.controller.output().calls.contains(&Call::Play));
    assert_eq!(s.app.now_playing.song_text(), "a.mp3");
}

#[test]
fn clicked_row_plays_and_playback_wraps_at_the_end() {
    let (mut s, audio) = session();
    s.select_folder("Happy_Hits", true);
    settle(&mut s);
    render(&mut s);
    assert_eq!(s.app.bindings.row_count(), 3);

    let row = s
        .app
        .bindings
        .regions()
        .iter()
        .find(|(_, t)| *t == Target::Action(UiAction::PlayRow(2)))
        .map(|(r, _)| *r)
        .unwrap();
    let action = s.app.bindings.hit(row.x + 2, row.y).unwrap();
    assert_eq!(s.dispatch(action), Flow::Continue);
    assert_eq!(s.controller.status().index, Some(2));
    assert_eq!(s.controller.status().state, PlaybackState::Playing);

    audio.send(ended(&s)).unwrap();
    assert!(s.drain());
    assert_eq!(s.controller.status().index, Some(0));
    assert_eq!(s.controller.status().state, PlaybackState::Playing);
    assert_eq!(s.app.selected, 0);
    assert_eq!(s.app.now_playing.song_text(), "a.mp3");
}

#[test]
fn stale_audio_events_do_not_advance() {
    let (mut s, audio) = session();
    s.select_folder("Happy_Hits", true);
    settle(&mut s);
    s.dispatch(UiAction::PlayRow(0));
    let old = ended(&s);
    s.dispatch(UiAction::PlayRow(1));

    audio.send(old).unwrap();
    s.drain();
    assert_eq!(s.controller.status().index, Some(1));
}

#[test]
fn switching_folders_stops_and_replaces_rows() {
    let (mut s, _audio) = session();
    s.select_folder("Happy_Hits", true);
    settle(&mut s);
    s.dispatch(UiAction::PlayRow(1));

    s.app.open_menu();
    s.dispatch(UiAction::SelectFolder("Chill".into()));
    assert!(!s.app.menu_open);
    settle(&mut s);

    assert_eq!(s.app.current_folder(), Some("Chill"));
    assert_eq!(s.app.playlist.len(), 2);
    assert_eq!(s.controller.status().state, PlaybackState::Empty);
    assert_eq!(s.controller.status().index, None);
    assert_eq!(s.app.now_playing.song, None);
    assert_eq!(s.controller.output().calls.last(), Some(&Call::Stop));
}

#[test]
fn only_the_latest_folder_selection_is_shown() {
    let (mut s, _audio) = session();
    s.select_folder("Happy_Hits", false);
    s.select_folder("Chill", false);
    settle(&mut s);
    // Give the superseded worker time to report, too.
    thread::sleep(Duration::from_millis(50));
    s.drain();

    assert_eq!(s.app.current_folder(), Some("Chill"));
    assert_eq!(s.app.playlist.len(), 2);
    assert_eq!(s.controller.tracks().folder(), Some("Chill"));
}

#[test]
fn failing_folder_shows_empty_list_and_transport_is_harmless() {
    let (mut s, _audio) = session();
    s.select_folder("Broken", true);
    settle(&mut s);

    assert!(s.app.playlist.is_empty());
    assert_eq!(s.app.current_folder(), Some("Broken"));
    for action in [
        UiAction::Next,
        UiAction::Previous,
        UiAction::PlaySelected,
        UiAction::TogglePlayPause,
        UiAction::SeekTo(0.5),
    ] {
        assert_eq!(s.dispatch(action), Flow::Continue);
    }
    assert_eq!(s.controller.status().state, PlaybackState::Empty);
}

#[test]
fn menu_cursor_chooses_folder() {
    let (mut s, _audio) = session();
    s.select_folder("Happy_Hits", false);
    settle(&mut s);

    s.dispatch(UiAction::OpenMenu);
    s.dispatch(UiAction::FolderCursorNext);
    s.dispatch(UiAction::ChooseFolderAtCursor);
    assert_eq!(s.app.loading.as_deref(), Some("Chill"));
    settle(&mut s);
    assert_eq!(s.app.current_folder(), Some("Chill"));
}

#[test]
fn dotted_folder_argument_matches_its_card() {
    let (mut s, _audio) = session();
    s.select_folder("./Chill", true);
    assert_eq!(s.app.loading.as_deref(), Some("Chill"));
    assert_eq!(s.app.folder_cursor, 1);
    settle(&mut s);

    assert_eq!(s.app.current_folder(), Some("Chill"));
    assert_eq!(s.app.playlist.len(), 2);
    assert_eq!(s.controller.status().index, Some(0));
}

#[test]
fn volume_keys_step_and_clamp() {
    let (mut s, _audio) = session();
    s.dispatch(UiAction::VolumeUp);
    assert_eq!(s.controller.status().volume, 90);
    s.dispatch(UiAction::VolumeUp);
    s.dispatch(UiAction::VolumeUp);
    assert_eq!(s.controller.status().volume, 100);
    s.drain();
    assert_eq!(s.app.now_playing.volume, 100);

    s.dispatch(UiAction::SetVolume(5));
    s.dispatch(UiAction::VolumeDown);
    assert_eq!(s.controller.status().volume, 0);
}

#[test]
fn media_controls_follow_play_state() {
    let (mut s, audio) = session();
    s.select_folder("Happy_Hits", true);
    settle(&mut s);

    s.control(ControlCmd::Pause);
    assert_eq!(s.controller.status().state, PlaybackState::Loaded);
    s.control(ControlCmd::Play);
    assert_eq!(s.controller.status().state, PlaybackState::Playing);
    s.control(ControlCmd::Play);
    assert_eq!(s.controller.status().state, PlaybackState::Playing);

    let token = s.controller.output().last_load().unwrap();
    audio
        .send(AudioEvent {
            token,
            kind: AudioEventKind::MetadataLoaded {
                duration: Duration::from_secs(100),
            },
        })
        .unwrap();
    audio
        .send(AudioEvent {
            token,
            kind: AudioEventKind::TimeUpdate {
                position: Duration::from_secs(40),
            },
        })
        .unwrap();
    s.drain();

    s.control(ControlCmd::Stop);
    assert_eq!(s.controller.status().state, PlaybackState::Paused);
    assert_eq!(s.controller.status().position, Duration::ZERO);

    s.control(ControlCmd::Next);
    assert_eq!(s.controller.status().index, Some(1));
    assert_eq!(s.control(ControlCmd::Quit), Flow::Quit);
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn keys_map_to_actions() {
    assert_eq!(key_action(key(KeyCode::Char('j')), false, 5), Some(UiAction::SelectNext));
    assert_eq!(key_action(key(KeyCode::Enter), false, 5), Some(UiAction::PlaySelected));
    assert_eq!(
        key_action(key(KeyCode::Char(' ')), false, 5),
        Some(UiAction::TogglePlayPause)
    );
    assert_eq!(key_action(key(KeyCode::Char('L')), false, 5), Some(UiAction::SeekBy(5)));
    assert_eq!(key_action(key(KeyCode::Char('H')), false, 5), Some(UiAction::SeekBy(-5)));
    assert_eq!(key_action(key(KeyCode::Char('+')), false, 5), Some(UiAction::VolumeUp));
    assert_eq!(key_action(key(KeyCode::Char('q')), true, 5), Some(UiAction::Quit));
    assert_eq!(key_action(key(KeyCode::Esc), false, 5), None);
    assert_eq!(key_action(key(KeyCode::Char('x')), false, 5), None);
}

#[test]
fn open_menu_takes_cursor_keys() {
    assert_eq!(
        key_action(key(KeyCode::Char('j')), true, 5),
        Some(UiAction::FolderCursorNext)
    );
    assert_eq!(
        key_action(key(KeyCode::Char('k')), true, 5),
        Some(UiAction::FolderCursorPrev)
    );
    assert_eq!(
        key_action(key(KeyCode::Enter), true, 5),
        Some(UiAction::ChooseFolderAtCursor)
    );
    assert_eq!(key_action(key(KeyCode::Esc), true, 5), Some(UiAction::CloseMenu));
    assert_eq!(key_action(key(KeyCode::Char('m')), true, 5), Some(UiAction::CloseMenu));
    assert_eq!(key_action(key(KeyCode::Char('m')), false, 5), Some(UiAction::OpenMenu));
}
