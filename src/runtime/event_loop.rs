use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::audio::AudioPlayer;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui::{self, UiAction};

use super::session::{Flow, Session};

/// Main terminal event loop: applies background results, draws, then
/// handles one round of input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session<AudioPlayer>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Keep MPRIS in sync even when playback changes on its own (auto-advance).
        if session.drain() {
            update_mpris(mpris, &session.controller);
        }

        terminal.draw(|f| ui::draw(f, &mut session.app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if session.control(cmd) == Flow::Quit {
                return Ok(());
            }
        }

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                key_action(key, session.app.menu_open, session.scrub_seconds())
            }
            Event::Mouse(mouse) => mouse_action(mouse, session),
            _ => None,
        };
        if let Some(action) = action {
            tracing::trace!(?action, "input");
            if session.dispatch(action) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

fn mouse_action(mouse: MouseEvent, session: &Session<AudioPlayer>) -> Option<UiAction> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            session.app.bindings.hit(mouse.column, mouse.row)
        }
        _ => None,
    }
}

/// Map a key press to an action. The open folder menu takes `j/k/Enter`.
pub(super) fn key_action(key: KeyEvent, menu_open: bool, scrub_seconds: i64) -> Option<UiAction> {
    let action = match key.code {
        KeyCode::Char('q') => UiAction::Quit,
        KeyCode::Char('m') | KeyCode::Esc if menu_open => UiAction::CloseMenu,
        KeyCode::Char('m') => UiAction::OpenMenu,
        KeyCode::Char('j') | KeyCode::Down if menu_open => UiAction::FolderCursorNext,
        KeyCode::Char('k') | KeyCode::Up if menu_open => UiAction::FolderCursorPrev,
        KeyCode::Enter if menu_open => UiAction::ChooseFolderAtCursor,
        KeyCode::Char('j') | KeyCode::Down => UiAction::SelectNext,
        KeyCode::Char('k') | KeyCode::Up => UiAction::SelectPrev,
        KeyCode::Enter => UiAction::PlaySelected,
        KeyCode::Char('p') | KeyCode::Char(' ') => UiAction::TogglePlayPause,
        KeyCode::Char('l') => UiAction::Next,
        KeyCode::Char('h') => UiAction::Previous,
        KeyCode::Char('L') => UiAction::SeekBy(scrub_seconds),
        KeyCode::Char('H') => UiAction::SeekBy(-scrub_seconds),
        KeyCode::Char('+') | KeyCode::Char('=') => UiAction::VolumeUp,
        KeyCode::Char('-') => UiAction::VolumeDown,
        _ => return None,
    };
    Some(action)
}
