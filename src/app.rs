//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the rendered playlist,
//! the now-playing view, the folder menu and the click bindings.

mod model;

pub use model::*;
