//! Festive Countdown - countdown-to-celebration sequencer
//! 
//! This library counts down to a fixed target time and, once reached or
//! triggered, plays a fixed celebration choreography of timed particle and
//! audio cues before revealing the final content of a holiday page.

pub mod api;
pub mod choreography;
pub mod config;
pub mod effects;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::{Config, TargetTime};
pub use state::{AppState, CountdownState, SequenceStage, Trigger};
pub use utils::signals::shutdown_signal;
