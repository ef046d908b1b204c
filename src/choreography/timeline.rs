//! Flattened, time-ordered celebration schedule

use std::time::Duration;

use super::{celebration_script, Cue, TimelineEntry};

/// Every effect of a run ordered by offset, plus a cursor marking what has
/// already fired. Advancing by elapsed time is the only way to consume it,
/// so tests can drive it with simulated durations.
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    cursor: usize,
}

impl Timeline {
    /// Expand a script. Entries sharing an offset keep script order.
    pub fn from_script(cues: &[Cue]) -> Self {
        let mut entries: Vec<TimelineEntry> = cues.iter().flat_map(Cue::expand).collect();
        entries.sort_by_key(|entry| entry.at);
        Self { entries, cursor: 0 }
    }

    /// Timeline of the standard celebration
    pub fn celebration() -> Self {
        Self::from_script(&celebration_script())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Number of entries already handed out
    pub fn fired(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Offset of the next entry still to fire
    pub fn next_offset(&self) -> Option<Duration> {
        self.entries.get(self.cursor).map(|entry| entry.at)
    }

    /// Take every unfired entry with `at <= elapsed`, in order
    pub fn due(&mut self, elapsed: Duration) -> &[TimelineEntry] {
        let start = self.cursor;
        while self
            .entries
            .get(self.cursor)
            .is_some_and(|entry| entry.at <= elapsed)
        {
            self.cursor += 1;
        }
        &self.entries[start..self.cursor]
    }
}
