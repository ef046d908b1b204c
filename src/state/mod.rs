//! State management module
//! 
//! This module contains the countdown state machine and the shared
//! application state that drives it.

pub mod app_state;
pub mod countdown_state;
pub mod events;
pub mod remaining;
pub mod sequencer_error;
pub mod stage;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{CountdownState, RunInfo, TickOutcome};
pub use events::PresentationEvent;
pub use remaining::Remaining;
pub use sequencer_error::SequencerError;
pub use stage::{SequenceStage, Trigger};
