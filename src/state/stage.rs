//! Celebration stage and trigger enumerations

use serde::{Deserialize, Serialize};

/// Where the celebration choreography stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceStage {
    /// Countdown view
    #[default]
    Idle,
    /// Celebration overlay with cues firing
    Running,
    /// Final content revealed
    Complete,
}

/// Who asked for the celebration to start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// "Start the Celebration" click, available once the target is reached
    Visitor,
    /// Automatic start on the tick that reaches the target
    Countdown,
    /// Test affordance, bypasses the countdown and freezes it
    Debug,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Visitor => "visitor",
            Trigger::Countdown => "countdown",
            Trigger::Debug => "debug",
        }
    }
}
