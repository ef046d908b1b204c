//! Rejected sequencer transitions

use std::fmt;

use super::SequenceStage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    /// A visitor tried to start before the target was reached
    NotReached,
    AlreadyRunning,
    AlreadyComplete,
    /// The shared state could not be locked
    StateLock(String),
}

impl SequencerError {
    /// Error for a start attempted from a non-idle stage
    pub fn from_stage(stage: SequenceStage) -> Option<Self> {
        match stage {
            SequenceStage::Idle => None,
            SequenceStage::Running => Some(SequencerError::AlreadyRunning),
            SequenceStage::Complete => Some(SequencerError::AlreadyComplete),
        }
    }

    /// Whether the request conflicted with the current stage, as opposed to
    /// an internal failure
    pub fn is_conflict(&self) -> bool {
        !matches!(self, SequencerError::StateLock(_))
    }
}

impl fmt::Display for SequencerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerError::NotReached => write!(f, "Countdown has not reached its target yet"),
            SequencerError::AlreadyRunning => write!(f, "Celebration is already running"),
            SequencerError::AlreadyComplete => write!(f, "Celebration has already completed"),
            SequencerError::StateLock(e) => write!(f, "Failed to lock countdown state: {}", e),
        }
    }
}

impl std::error::Error for SequencerError {}
