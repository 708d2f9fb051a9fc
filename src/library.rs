//! Folder listings: fetching, parsing and the current track list.

mod listing;
mod loader;
mod model;
mod source;

pub use loader::{LoadTicket, PlaylistLoader, fetch_tracks};
pub use model::{Track, TrackList};
pub use source::{HttpListingSource, ListingSource, http_agent};

#[cfg(test)]
pub(crate) mod tests;
