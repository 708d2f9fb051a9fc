use std::env;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::library::{HttpListingSource, PlaylistLoader};
use crate::logging;
use crate::mpris::ControlCmd;
use crate::player::PlaybackController;

mod event_loop;
mod folders;
mod mpris_sync;
mod session;
mod settings;

use session::Session;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();

    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("songdeck: logging disabled: {e}");
            None
        }
    };
    if let Some(msg) = config_problem {
        tracing::warn!("{msg}");
    }

    let folder = env::args()
        .nth(1)
        .unwrap_or_else(|| settings.library.default_folder.clone());

    let source = Arc::new(HttpListingSource::new(&settings.server)?);
    let (audio_player, audio_events) =
        AudioPlayer::new(settings.audio.clone(), &settings.server);
    let controller = PlaybackController::new(audio_player, settings.audio.initial_volume);
    let loader = PlaylistLoader::new(settings.library.track_suffix.clone());

    let mut app = App::new(
        settings.library.folders.clone(),
        &settings.ui.row_label,
        settings.audio.initial_volume,
    );
    app.menu_open = settings.ui.menu_open;

    let mut session = Session::new(
        app,
        controller,
        loader,
        source,
        audio_events,
        settings.audio.volume_step,
        settings.controls.scrub_seconds,
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &session.controller);

    session.select_folder(&folder, true);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut session, &mpris, &control_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session
        .controller
        .output()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    tracing::info!("bye");

    run_result
}

#[cfg(test)]
mod tests;
