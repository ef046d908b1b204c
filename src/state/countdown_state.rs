//! Countdown and celebration state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Remaining, SequenceStage, SequencerError, Trigger};

/// What a tick observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Target still in the future
    Counting,
    /// This tick is the first to see the target reached
    Reached,
    AlreadyReached,
    /// Test mode is on, nothing was updated
    Frozen,
}

/// Bookkeeping for one celebration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: u64,
    pub trigger: Trigger,
    pub started_at: DateTime<Utc>,
    pub cues_fired: u32,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Countdown state shared with the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    /// Fixed for the lifetime of the process
    pub target: DateTime<Utc>,
    pub remaining: Remaining,
    /// Milliseconds left, clamped at zero
    pub remaining_ms: u64,
    /// Flips to true once and stays there until `reset`
    pub reached: bool,
    pub stage: SequenceStage,
    /// Set by the debug trigger; freezes ticking
    pub test_mode: bool,
    pub run: Option<RunInfo>,
}

impl CountdownState {
    pub fn new(target: DateTime<Utc>) -> Self {
        Self {
            target,
            remaining: Remaining::zero(),
            remaining_ms: 0,
            reached: false,
            stage: SequenceStage::Idle,
            test_mode: false,
            run: None,
        }
    }

    /// Recompute the remaining time against `now`
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.test_mode {
            return TickOutcome::Frozen;
        }

        let difference = (self.target - now).num_milliseconds();

        if self.reached {
            self.remaining = Remaining::zero();
            self.remaining_ms = 0;
            return TickOutcome::AlreadyReached;
        }

        self.remaining = Remaining::from_millis(difference);
        self.remaining_ms = difference.max(0) as u64;

        if difference > 0 {
            TickOutcome::Counting
        } else {
            self.reached = true;
            TickOutcome::Reached
        }
    }

    /// Move Idle -> Running for a new run with id `run_id`
    pub fn begin_run(
        &mut self,
        trigger: Trigger,
        run_id: u64,
        now: DateTime<Utc>,
    ) -> Result<&RunInfo, SequencerError> {
        if let Some(err) = SequencerError::from_stage(self.stage) {
            return Err(err);
        }
        if trigger != Trigger::Debug && !self.reached {
            return Err(SequencerError::NotReached);
        }

        if trigger == Trigger::Debug {
            self.test_mode = true;
        }
        self.stage = SequenceStage::Running;

        Ok(&*self.run.insert(RunInfo {
            id: run_id,
            trigger,
            started_at: now,
            cues_fired: 0,
            completed_at: None,
        }))
    }

    /// Whether `run_id` is the run currently driving the stage
    pub fn is_current_run(&self, run_id: u64) -> bool {
        self.stage == SequenceStage::Running
            && self.run.as_ref().is_some_and(|run| run.id == run_id)
    }

    /// Count a fired cue; false when the run is stale
    pub fn record_cue(&mut self, run_id: u64) -> bool {
        if !self.is_current_run(run_id) {
            return false;
        }
        if let Some(run) = self.run.as_mut() {
            run.cues_fired += 1;
        }
        true
    }

    /// Running -> Complete at the end of `run_id`; false when the run is stale
    pub fn complete_run(&mut self, run_id: u64, now: DateTime<Utc>) -> bool {
        if !self.is_current_run(run_id) {
            return false;
        }
        self.stage = SequenceStage::Complete;
        if let Some(run) = self.run.as_mut() {
            run.completed_at = Some(now);
        }
        true
    }

    /// Jump straight to Complete. Returns the id of the run that was cut
    /// short, if one was running.
    pub fn force_complete(&mut self, now: DateTime<Utc>) -> Option<u64> {
        match self.stage {
            SequenceStage::Complete => None,
            SequenceStage::Idle => {
                self.stage = SequenceStage::Complete;
                None
            }
            SequenceStage::Running => {
                self.stage = SequenceStage::Complete;
                self.run.as_mut().map(|run| {
                    run.completed_at = Some(now);
                    run.id
                })
            }
        }
    }

    /// Back to the initial values. The target is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.target);
    }
}
