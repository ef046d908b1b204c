//! Presentation effects
//!
//! Typed payloads for the page's particle and audio facilities. The sequencer
//! only describes effects; rendering and playback stay in the browser.

pub mod audio;
pub mod burst;
pub mod palette;

use serde::{Deserialize, Serialize};

pub use audio::AudioAction;
pub use burst::{BurstSpec, Coord, Origin, Shape};

/// What a fired cue asks the presentation layer to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// One or more simultaneous particle bursts
    Burst { bursts: Vec<BurstSpec> },
    Audio { audio: AudioAction },
    /// Hide the celebration overlay and show the final content
    Reveal,
}

impl Effect {
    pub fn burst(burst: BurstSpec) -> Self {
        Effect::Burst { bursts: vec![burst] }
    }

    pub fn bursts(bursts: Vec<BurstSpec>) -> Self {
        Effect::Burst { bursts }
    }

    pub fn audio(audio: AudioAction) -> Self {
        Effect::Audio { audio }
    }

    pub fn is_reveal(&self) -> bool {
        matches!(self, Effect::Reveal)
    }

    /// Total particles across all bursts of this effect
    pub fn particle_count(&self) -> u32 {
        match self {
            Effect::Burst { bursts } => bursts.iter().map(|b| b.particle_count).sum(),
            _ => 0,
        }
    }
}
