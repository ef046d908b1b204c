//! Cue definitions

use std::time::Duration;

use crate::effects::{BurstSpec, Effect};

/// How a cue fires relative to its offset
#[derive(Debug, Clone, PartialEq)]
pub enum CueKind {
    /// A single effect at the cue offset
    Once(Effect),
    /// The same bursts fired every `every` while inside `window`
    Stream {
        every: Duration,
        window: Duration,
        bursts: Vec<BurstSpec>,
        /// Scale particle counts by the time left in the window
        decay: bool,
    },
}

/// A named step of the celebration, scheduled at `offset` from run start
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub name: &'static str,
    pub offset: Duration,
    pub kind: CueKind,
}

/// One concrete effect at one concrete offset
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub at: Duration,
    pub cue: &'static str,
    pub effect: Effect,
}

impl Cue {
    pub fn once(name: &'static str, offset_ms: u64, effect: Effect) -> Self {
        Self {
            name,
            offset: Duration::from_millis(offset_ms),
            kind: CueKind::Once(effect),
        }
    }

    pub fn stream(
        name: &'static str,
        offset_ms: u64,
        every_ms: u64,
        window_ms: u64,
        bursts: Vec<BurstSpec>,
    ) -> Self {
        Self {
            name,
            offset: Duration::from_millis(offset_ms),
            kind: CueKind::Stream {
                every: Duration::from_millis(every_ms),
                window: Duration::from_millis(window_ms),
                bursts,
                decay: false,
            },
        }
    }

    /// Make a stream cue fade its particle counts out over the window
    pub fn decaying(mut self) -> Self {
        if let CueKind::Stream { decay, .. } = &mut self.kind {
            *decay = true;
        }
        self
    }

    /// Offset of the last effect this cue produces
    pub fn last_offset(&self) -> Duration {
        self.expand()
            .last()
            .map(|entry| entry.at)
            .unwrap_or(self.offset)
    }

    /// Flatten into timeline entries in firing order.
    ///
    /// A stream fires at `offset + k * every` for every `k * every < window`.
    pub fn expand(&self) -> Vec<TimelineEntry> {
        match &self.kind {
            CueKind::Once(effect) => vec![TimelineEntry {
                at: self.offset,
                cue: self.name,
                effect: effect.clone(),
            }],
            CueKind::Stream { every, window, bursts, decay } => {
                let every_ms = every.as_millis() as u64;
                let window_ms = window.as_millis() as u64;
                if every_ms == 0 {
                    return Vec::new();
                }

                (0..)
                    .map(|k| k * every_ms)
                    .take_while(|elapsed| *elapsed < window_ms)
                    .map(|elapsed| {
                        let left = window_ms - elapsed;
                        let bursts = bursts
                            .iter()
                            .map(|b| if *decay { b.scaled(left, window_ms) } else { b.clone() })
                            .collect();
                        TimelineEntry {
                            at: self.offset + Duration::from_millis(elapsed),
                            cue: self.name,
                            effect: Effect::bursts(bursts),
                        }
                    })
                    .collect()
            }
        }
    }
}
