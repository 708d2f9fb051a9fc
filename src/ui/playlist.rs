use crate::library::TrackList;

/// One rendered playlist entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub label: String,
}

/// The rows shown for the current track list.
///
/// Rows are always rebuilt from scratch; row `i` plays track `i`.
#[derive(Debug, Default)]
pub struct PlaylistView {
    rows: Vec<Row>,
    folder: Option<String>,
    label: String,
}

impl PlaylistView {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            folder: None,
            label: label.into(),
        }
    }

    /// Replace all rows with one per track.
    pub fn render(&mut self, tracks: &TrackList) {
        self.rows.clear();
        self.rows.extend(tracks.tracks().iter().map(|t| Row {
            name: t.name.clone(),
            label: self.label.clone(),
        }));
        self.folder = tracks.folder().map(str::to_string);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
