//! Audio actions handed to the page's playback facility

use serde::{Deserialize, Serialize};

/// A single instruction for the celebration soundtrack.
///
/// Playback is best-effort on the page side: a browser refusing autoplay
/// simply means no sound, never an error surfaced to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AudioAction {
    /// Rewind to the start and play
    Play { looped: bool },
    /// Lower the volume in equal steps, then pause and restore the volume
    FadeOut { duration_ms: u64, step_ms: u64 },
    /// Pause immediately and rewind
    Stop,
}

impl AudioAction {
    /// Looping playback from the beginning
    pub fn play_looped() -> Self {
        AudioAction::Play { looped: true }
    }

    /// Fade out over `duration_ms` with 50 ms volume steps
    pub fn fade_out(duration_ms: u64) -> Self {
        AudioAction::FadeOut { duration_ms, step_ms: 50 }
    }

    /// Number of volume decrements a fade performs (zero for other actions)
    pub fn fade_steps(&self) -> u64 {
        match self {
            AudioAction::FadeOut { duration_ms, step_ms } if *step_ms > 0 => {
                duration_ms.div_ceil(*step_ms)
            }
            _ => 0,
        }
    }
}
