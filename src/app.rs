//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the gallery, the open
//! album, the playback session and the lyrics panel state.

mod model;
mod panel;

pub use model::*;
pub use panel::*;
