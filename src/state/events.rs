//! Events pushed to the presentation layer

use serde::{Deserialize, Serialize};

use crate::effects::Effect;

use super::SequenceStage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    /// A cue of run `run_id` fired `offset_ms` after the run started
    Cue {
        run_id: u64,
        cue: String,
        offset_ms: u64,
        effect: Effect,
    },
    /// The celebration stage changed
    Stage {
        stage: SequenceStage,
        run_id: Option<u64>,
    },
}

impl PresentationEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            PresentationEvent::Cue { .. } => "cue",
            PresentationEvent::Stage { .. } => "stage",
        }
    }
}
