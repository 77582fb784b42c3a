//! Lyric synchronization: active-line lookup, panel layout and scroll anchoring.
//!
//! Nothing in here stores the active line. It is derived from the playback
//! position every time it is needed; only the scroll state remembers which
//! line it last centered.

mod anchor;
mod layout;
mod model;
mod sync;

pub use anchor::*;
pub use layout::*;
pub use model::*;
pub use sync::*;
