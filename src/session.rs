//! Consumer-side playback state machine.
//!
//! The session decides what plays: it reacts to track selection and to the
//! driver's time-update / ended signals and answers with `Effect`s for the
//! runtime to carry out. Auto-advance happens here and nowhere else.

mod machine;

pub use machine::*;

#[cfg(test)]
mod tests;
