use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::library::{LoadTicket, ListingSource, TrackList, fetch_tracks};

/// A folder listing fetched off the UI thread.
#[derive(Debug)]
pub struct FolderLoaded {
    pub ticket: LoadTicket,
    pub tracks: TrackList,
    /// Point the controller at the first track once published.
    pub autoload: bool,
}

/// Fetch `ticket`'s folder on a worker thread and report back on `tx`.
pub fn spawn_folder_load(
    source: Arc<dyn ListingSource>,
    ticket: LoadTicket,
    suffix: String,
    autoload: bool,
    tx: Sender<FolderLoaded>,
) {
    std::thread::spawn(move || {
        let tracks = fetch_tracks(source.as_ref(), ticket.folder(), &suffix);
        // The receiver is gone only when the app is shutting down.
        let _ = tx.send(FolderLoaded {
            ticket,
            tracks,
            autoload,
        });
    });
}
