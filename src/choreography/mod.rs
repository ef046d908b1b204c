//! Celebration choreography
//!
//! The celebration is data: a script of [`Cue`]s expanded into a
//! [`Timeline`] that a single scheduling routine walks by elapsed time.

pub mod cue;
pub mod script;
pub mod timeline;

pub use cue::{Cue, CueKind, TimelineEntry};
pub use script::{celebration_script, AUDIO_FADE_MS, REVEAL_AFTER};
pub use timeline::Timeline;
