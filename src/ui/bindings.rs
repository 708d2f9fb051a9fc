//! Mouse hit map: which screen region triggers which action.

use ratatui::layout::{Position, Rect};

/// Something the user asked for, by click or key.
#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    PlayRow(usize),
    PlaySelected,
    SelectNext,
    SelectPrev,
    TogglePlayPause,
    Next,
    Previous,
    /// Fraction of the track, `0.0..=1.0`.
    SeekTo(f64),
    SeekBy(i64),
    SetVolume(u8),
    VolumeUp,
    VolumeDown,
    SelectFolder(String),
    FolderCursorNext,
    FolderCursorPrev,
    ChooseFolderAtCursor,
    OpenMenu,
    CloseMenu,
    ToggleMenu,
    Quit,
}

/// A clickable region.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    Action(UiAction),
    /// Click column maps to a seek fraction.
    SeekBar,
    /// Click column maps to a volume percentage.
    VolumeBar,
}

/// Regions registered during the last draw.
///
/// Cleared at the start of every draw, so a region can only refer to what
/// is on screen right now (row `i` always means track `i` of the list
/// that was drawn).
#[derive(Debug, Default)]
pub struct Bindings {
    regions: Vec<(Rect, Target)>,
}

impl Bindings {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn register(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    #[cfg(test)]
    pub fn regions(&self) -> &[(Rect, Target)] {
        &self.regions
    }

    /// Count regions bound to `PlayRow`.
    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|(_, t)| matches!(t, Target::Action(UiAction::PlayRow(_))))
            .count()
    }

    /// Resolve a click. Later registrations (overlays) win.
    pub fn hit(&self, column: u16, row: u16) -> Option<UiAction> {
        let pos = Position::new(column, row);
        let (area, target) = self.regions.iter().rev().find(|(r, _)| r.contains(pos))?;

        match target {
            Target::Action(action) => Some(action.clone()),
            Target::SeekBar => Some(UiAction::SeekTo(fraction(*area, column))),
            Target::VolumeBar => {
                Some(UiAction::SetVolume((fraction(*area, column) * 100.0).round() as u8))
            }
        }
    }
}

/// Horizontal position of `column` within `area`: 0.0 at the left edge, 1.0 at the right.
fn fraction(area: Rect, column: u16) -> f64 {
    let span = area.width.saturating_sub(1).max(1) as f64;
    (column.saturating_sub(area.x) as f64 / span).clamp(0.0, 1.0)
}
