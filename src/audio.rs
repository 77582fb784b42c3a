//! Audio playback driver.
//!
//! A dedicated thread owns the `rodio` output stream and the current sink. The
//! UI talks to it with `AudioCmd`s and hears back through `DriverEvent`s:
//! periodic time updates, pause/resume acknowledgements, end of track and
//! failures. The driver never picks the next track itself; that decision
//! belongs to the playback session.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;
