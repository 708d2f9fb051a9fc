use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::player::PlaybackState;

use super::bindings::{Bindings, Target, UiAction};

/// Terminal lines per playlist row / folder card (name + label).
const ITEM_HEIGHT: u16 = 2;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L is filled dynamically from config.
    map.insert("+/-", "volume");
    map.insert("m", "folders");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = ["j/k", "enter", "space/p", "h/l", "H/L", "+/-", "m", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// First and one-past-last item to show so that `selected` stays roughly centered.
pub(super) fn visible_window(total: usize, selected: usize, capacity: usize) -> (usize, usize) {
    if capacity == 0 {
        return (0, 0);
    }
    if total <= capacity {
        return (0, total);
    }
    let half = capacity / 2;
    let mut start = selected.saturating_sub(half);
    if start + capacity > total {
        start = total - capacity;
    }
    (start, start + capacity)
}

/// Area of the `k`-th two-line item inside `inner`.
fn item_rect(inner: Rect, k: usize) -> Rect {
    let y = inner.y + (k as u16) * ITEM_HEIGHT;
    Rect {
        x: inner.x,
        y,
        width: inner.width,
        height: ITEM_HEIGHT.min(inner.bottom().saturating_sub(y)),
    }
}

fn left_padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI and rebuild `app.bindings` for what was drawn.
pub fn draw(
    frame: &mut Frame,
    app: &mut App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let mut bindings = std::mem::take(&mut app.bindings);
    bindings.clear();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], ui_settings, &mut bindings);

    if app.menu_open {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Min(10)])
            .split(chunks[1]);
        draw_playlist(frame, app, body[1], &mut bindings);
        draw_menu(frame, app, body[0], &mut bindings);
    } else {
        draw_playlist(frame, app, chunks[1], &mut bindings);
    }

    draw_now_playing(frame, app, chunks[2]);
    draw_seek_bar(frame, app, chunks[3], &mut bindings);
    draw_transport(frame, app, chunks[4], &mut bindings);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(left_padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[5]);

    app.bindings = bindings;
}

fn draw_header(frame: &mut Frame, area: Rect, ui_settings: &UiSettings, bindings: &mut Bindings) {
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" songdeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);

    // Hamburger toggle in the top-left corner of the header.
    let burger = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: 3.min(area.width.saturating_sub(2)),
        height: 1.min(area.height.saturating_sub(2)),
    };
    frame.render_widget(Paragraph::new("[≡]"), burger);
    bindings.register(burger, Target::Action(UiAction::ToggleMenu));
}

fn draw_playlist(frame: &mut Frame, app: &App, area: Rect, bindings: &mut Bindings) {
    let shown = app.current_folder().unwrap_or("playlist");
    let title = match &app.loading {
        Some(folder) => format!(" {shown} · loading {folder}… "),
        None => format!(" {shown} "),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.playlist.is_empty() {
        let text = match &app.loading {
            Some(folder) => format!("Loading {folder}…"),
            None => "No tracks".to_string(),
        };
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).dim(),
            inner,
        );
        return;
    }

    let rows = app.playlist.rows();
    let capacity = (inner.height / ITEM_HEIGHT) as usize;
    let (start, end) = visible_window(rows.len(), app.selected, capacity);

    // Only build ListItems for the visible window (avoid allocating the entire list).
    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .enumerate()
        .map(|(k, row)| {
            let i = start + k;
            let marker = if app.now_playing.index == Some(i) {
                "♪ "
            } else {
                "  "
            };
            ListItem::new(Text::from(vec![
                Line::from(vec![Span::raw(marker), Span::raw(row.name.as_str())]),
                Line::from(vec![Span::raw("  "), Span::raw(row.label.as_str()).dim()]),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if (start..end).contains(&app.selected) {
        state.select(Some(app.selected - start));
    }
    frame.render_stateful_widget(list, inner, &mut state);

    for k in 0..(end - start) {
        bindings.register(
            item_rect(inner, k),
            Target::Action(UiAction::PlayRow(start + k)),
        );
    }
}

fn draw_menu(frame: &mut Frame, app: &App, area: Rect, bindings: &mut Bindings) {
    let block = Block::default().borders(Borders::ALL).title(" folders ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let capacity = (inner.height / ITEM_HEIGHT) as usize;
    let (start, end) = visible_window(app.folders.len(), app.folder_cursor, capacity);
    let items: Vec<ListItem> = app.folders[start..end]
        .iter()
        .map(|card| {
            let marker = if app.current_folder() == Some(card.id.as_str()) {
                "● "
            } else {
                "  "
            };
            ListItem::new(Text::from(vec![
                Line::from(vec![Span::raw(marker), Span::raw(card.label()).bold()]),
                Line::from(vec![Span::raw("  "), Span::raw(card.description.as_str()).dim()]),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if (start..end).contains(&app.folder_cursor) {
        state.select(Some(app.folder_cursor - start));
    }
    frame.render_stateful_widget(list, inner, &mut state);

    for (k, card) in app.folders[start..end].iter().enumerate() {
        bindings.register(
            item_rect(inner, k),
            Target::Action(UiAction::SelectFolder(card.id.clone())),
        );
    }

    // Close button sits on the top border, right-aligned.
    if area.width >= 6 {
        let close = Rect {
            x: area.right() - 4,
            y: area.y,
            width: 3,
            height: 1,
        };
        frame.render_widget(Paragraph::new("[x]"), close);
        bindings.register(close, Target::Action(UiAction::CloseMenu));
    }
}

fn draw_now_playing(frame: &mut Frame, app: &App, area: Rect) {
    let np = &app.now_playing;
    let state = match np.state {
        PlaybackState::Empty => "Stopped",
        PlaybackState::Loaded => "Ready",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    };
    let song = if np.song_text().is_empty() {
        "Nothing loaded"
    } else {
        np.song_text()
    };
    let line = Line::from(vec![
        Span::raw(song).bold(),
        Span::raw(" • "),
        Span::raw(np.time_text()),
        Span::raw(" • "),
        Span::raw(state),
    ]);
    frame.render_widget(Paragraph::new(line).block(left_padded(" now playing ")), area);
}

/// `━━━━●────` with the knob at `percent` of `width` cells.
pub(super) fn seek_bar_text(percent: f64, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    let last = f64::from(width - 1);
    let knob = ((percent.clamp(0.0, 100.0) / 100.0) * last).round() as u16;
    (0..width)
        .map(|c| match c.cmp(&knob) {
            std::cmp::Ordering::Less => '━',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '─',
        })
        .collect()
}

fn draw_seek_bar(frame: &mut Frame, app: &App, area: Rect, bindings: &mut Bindings) {
    let block = Block::default().borders(Borders::ALL).title(" seek ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bar = seek_bar_text(app.now_playing.progress_percent(), inner.width);
    frame.render_widget(Paragraph::new(bar), inner);
    bindings.register(inner, Target::SeekBar);
}

/// `██████░░░░` filled to `percent` of `width` cells.
pub(super) fn volume_bar_text(percent: u8, width: u16) -> String {
    let filled = (u32::from(percent.min(100)) * u32::from(width) / 100) as usize;
    let width = width as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn draw_transport(frame: &mut Frame, app: &App, area: Rect, bindings: &mut Bindings) {
    let block = Block::default().borders(Borders::ALL).title(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(inner);

    let buttons = [
        ("[ ⏮ ]".to_string(), UiAction::Previous),
        (format!("[ {} ]", app.now_playing.play_icon()), UiAction::TogglePlayPause),
        ("[ ⏭ ]".to_string(), UiAction::Next),
    ];
    for (k, (label, action)) in buttons.into_iter().enumerate() {
        frame.render_widget(Paragraph::new(label), parts[k]);
        bindings.register(parts[k], Target::Action(action));
    }

    let volume = app.now_playing.volume;
    frame.render_widget(Paragraph::new("vol"), parts[4]);
    frame.render_widget(
        Paragraph::new(volume_bar_text(volume, parts[5].width)),
        parts[5],
    );
    bindings.register(parts[5], Target::VolumeBar);
    frame.render_widget(
        Paragraph::new(format!("{volume:>3}%")).alignment(Alignment::Right),
        parts[6],
    );
}
