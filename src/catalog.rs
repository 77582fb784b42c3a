//! Album gallery: manifest discovery, loading and validation.
//!
//! Each album lives in its own directory next to an `album.toml` (or
//! `album.json`) manifest describing the album and its tracks. Timed lyrics
//! come from the manifest itself or from LRC files.

mod error;
mod lrc;
mod manifest;
mod model;
mod scan;

pub use error::*;
pub use lrc::*;
pub use manifest::*;
pub use model::*;
pub use scan::*;
