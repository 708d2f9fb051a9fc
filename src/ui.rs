//! Terminal UI: rendering with `ratatui` and click bindings.
//!
//! Every draw rebuilds the playlist rows' screen regions together with the
//! actions bound to them, so a click can never reach a row of a list that
//! is no longer displayed.

mod bindings;
mod draw;
mod now_playing;
mod playlist;

pub use bindings::{Bindings, Target, UiAction};
pub use draw::draw;
pub use now_playing::NowPlaying;
pub use playlist::{PlaylistView, Row};
