use super::listing::parse_listing;
use super::model::TrackList;
use super::source::{ListingSource, normalize_folder};

/// Identifies one folder load; only the most recent ticket may publish its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    folder: String,
}

impl LoadTicket {
    pub fn folder(&self) -> &str {
        &self.folder
    }
}

/// Owns the current track list.
///
/// A load is split into `begin` (on the UI thread), the fetch (anywhere,
/// see [`fetch_tracks`]) and `finish` (back on the UI thread). Every `begin`
/// supersedes the previous ticket, so a slow response for an old folder can
/// never overwrite the list of a folder selected after it.
#[derive(Debug)]
pub struct PlaylistLoader {
    suffix: String,
    generation: u64,
    tracks: TrackList,
}

impl PlaylistLoader {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            generation: 0,
            tracks: TrackList::default(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Start loading `folder`, superseding any load still in flight.
    ///
    /// The ticket carries the normalized folder id (`./Chill` becomes `Chill`).
    pub fn begin(&mut self, folder: &str) -> LoadTicket {
        let folder = normalize_folder(folder);
        self.generation += 1;
        tracing::info!(folder, generation = self.generation, "loading folder");
        LoadTicket {
            generation: self.generation,
            folder: folder.to_string(),
        }
    }

    /// Publish the result of `ticket`. Returns `None` when a newer load has
    /// started since, in which case `tracks` is dropped.
    pub fn finish(&mut self, ticket: LoadTicket, tracks: TrackList) -> Option<&TrackList> {
        if ticket.generation != self.generation {
            tracing::debug!(
                folder = ticket.folder.as_str(),
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded folder listing"
            );
            return None;
        }

        tracing::info!(folder = ticket.folder.as_str(), tracks = tracks.len(), "folder loaded");
        self.tracks = tracks;
        Some(&self.tracks)
    }
}

/// Fetch and parse `folder`. Failures are logged and yield an empty list.
pub fn fetch_tracks(source: &dyn ListingSource, folder: &str, suffix: &str) -> TrackList {
    let page_url = match source.folder_url(folder) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(folder, error = %e, "cannot build folder url");
            return TrackList::empty(folder);
        }
    };

    match source.fetch_listing(folder) {
        Ok(body) => {
            let tracks = parse_listing(&body, &page_url, suffix);
            if tracks.is_empty() {
                tracing::info!(folder, "no tracks found");
            }
            TrackList::new(folder, tracks)
        }
        Err(e) => {
            tracing::warn!(folder, error = %e, "failed to fetch folder listing");
            TrackList::empty(folder)
        }
    }
}
