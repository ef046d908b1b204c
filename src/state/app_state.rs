//! Main application state management

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::{
    sync::{broadcast, watch},
    task::AbortHandle,
};
use tracing::{debug, info, warn};

use super::{CountdownState, PresentationEvent, SequenceStage, SequencerError, TickOutcome, Trigger};
use crate::{
    choreography::{Timeline, TimelineEntry},
    effects::{AudioAction, Effect},
    tasks::{celebration_task, countdown_ticker_task},
    utils::Clock,
};

/// Owns the countdown state, the notification channels and the background
/// tasks driving them. Dropping the tasks is done through [`AppState::teardown`].
#[derive(Debug)]
pub struct AppState {
    /// Countdown and celebration state
    pub countdown: Arc<Mutex<CountdownState>>,
    /// Start the celebration automatically when the target is reached
    pub auto_start: bool,
    clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Fired cues and stage changes for the page
    pub event_tx: broadcast::Sender<PresentationEvent>,
    /// Latest countdown snapshot
    pub countdown_tx: watch::Sender<CountdownState>,
    /// Keep the receiver alive to prevent channel closure
    pub _countdown_rx: watch::Receiver<CountdownState>,
    next_run_id: AtomicU64,
    ticker_task: Mutex<Option<AbortHandle>>,
    celebration_task: Mutex<Option<AbortHandle>>,
}

impl AppState {
    /// Create the state for `target`, ticked once against `clock`
    pub fn new(target: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        let mut countdown = CountdownState::new(target);
        countdown.tick(clock.now());

        let (event_tx, _) = broadcast::channel(256);
        let (countdown_tx, countdown_rx) = watch::channel(countdown.clone());

        Self {
            countdown: Arc::new(Mutex::new(countdown)),
            auto_start: false,
            clock,
            start_time: Instant::now(),
            port: 0,
            host: String::new(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            countdown_tx,
            _countdown_rx: countdown_rx,
            next_run_id: AtomicU64::new(1),
            ticker_task: Mutex::new(None),
            celebration_task: Mutex::new(None),
        }
    }

    /// Record the address the bridge is served on
    pub fn with_address(mut self, host: String, port: u16) -> Self {
        self.host = host;
        self.port = port;
        self
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock_countdown(&self) -> Result<std::sync::MutexGuard<'_, CountdownState>, String> {
        self.countdown
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))
    }

    /// Get current countdown state
    pub fn get_countdown(&self) -> Result<CountdownState, String> {
        self.lock_countdown().map(|state| state.clone())
    }

    /// Subscribe to fired cues and stage changes
    pub fn subscribe_events(&self) -> broadcast::Receiver<PresentationEvent> {
        self.event_tx.subscribe()
    }

    /// Watch countdown snapshots
    pub fn watch_countdown(&self) -> watch::Receiver<CountdownState> {
        self.countdown_tx.subscribe()
    }

    fn publish_snapshot(&self, snapshot: CountdownState) {
        if let Err(e) = self.countdown_tx.send(snapshot) {
            warn!("Failed to send countdown update: {}", e);
        }
    }

    fn publish_event(&self, event: PresentationEvent) {
        // No subscribers is the normal case when no page is connected
        if let Err(e) = self.event_tx.send(event) {
            debug!("No listeners for presentation event: {}", e);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Recompute the remaining time. Starting the celebration is left to the
    /// caller.
    pub fn tick(&self) -> Result<TickOutcome, String> {
        let now = self.now();
        let mut state = self.lock_countdown()?;
        let outcome = state.tick(now);
        let (target, remaining) = (state.target, state.remaining);
        if outcome != TickOutcome::Frozen {
            self.publish_snapshot(state.clone());
        }
        drop(state);

        match outcome {
            TickOutcome::Reached => info!("Countdown reached its target at {}", target),
            TickOutcome::Counting => debug!("Countdown remaining: {}", remaining),
            TickOutcome::AlreadyReached | TickOutcome::Frozen => {}
        }

        Ok(outcome)
    }

    /// Whether the ticker should start the celebration: auto-start is on and
    /// the target has been reached with nothing run since the last reset
    pub fn auto_start_due(&self) -> bool {
        self.auto_start
            && self
                .lock_countdown()
                .map(|state| state.reached && state.stage == SequenceStage::Idle && !state.test_mode)
                .unwrap_or(false)
    }

    /// Idle -> Running, scheduling the celebration choreography
    pub fn start_sequence(self: &Arc<Self>, trigger: Trigger) -> Result<CountdownState, SequencerError> {
        let now = self.now();
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);

        // Events are published under the countdown lock so the page never
        // sees a cue of this run before the stage change announcing it
        let mut state = self
            .lock_countdown()
            .map_err(SequencerError::StateLock)?;
        state.begin_run(trigger, run_id, now)?;
        let snapshot = state.clone();

        let started = tokio::time::Instant::now();
        let handle = tokio::spawn(celebration_task(
            Arc::clone(self),
            run_id,
            started,
            Timeline::celebration(),
        ));
        self.replace_celebration_task(Some(handle.abort_handle()));

        self.publish_event(PresentationEvent::Stage {
            stage: SequenceStage::Running,
            run_id: Some(run_id),
        });
        self.publish_snapshot(snapshot.clone());
        drop(state);

        info!("Celebration run {} started by {} trigger", run_id, trigger.as_str());
        self.record_action(&format!("start-{}", trigger.as_str()));

        Ok(snapshot)
    }

    /// Fire one timeline entry of `run_id`. Returns false when the run is no
    /// longer current, in which case nothing was published.
    pub fn fire_cue(&self, run_id: u64, entry: &TimelineEntry) -> Result<bool, String> {
        let now = self.now();
        let mut state = self.lock_countdown()?;
        if !state.record_cue(run_id) {
            return Ok(false);
        }
        let completed = entry.effect.is_reveal() && state.complete_run(run_id, now);

        self.publish_event(PresentationEvent::Cue {
            run_id,
            cue: entry.cue.to_string(),
            offset_ms: entry.at.as_millis() as u64,
            effect: entry.effect.clone(),
        });
        if completed {
            self.publish_event(PresentationEvent::Stage {
                stage: SequenceStage::Complete,
                run_id: Some(run_id),
            });
        }
        self.publish_snapshot(state.clone());
        drop(state);

        debug!(
            "Run {} fired cue {} at {:?} ({} particles)",
            run_id,
            entry.cue,
            entry.at,
            entry.effect.particle_count()
        );
        if let Effect::Audio { audio } = &entry.effect {
            debug!("Audio action {:?} ({} fade steps)", audio, audio.fade_steps());
        }
        if completed {
            info!("Celebration run {} complete", run_id);
        }
        Ok(true)
    }

    /// Skip to the final content, cancelling a running celebration
    pub fn force_complete(&self) -> Result<CountdownState, SequencerError> {
        let now = self.now();
        let mut state = self
            .lock_countdown()
            .map_err(SequencerError::StateLock)?;
        if state.stage == SequenceStage::Complete {
            debug!("Skip requested but the celebration is already complete");
            return Ok(state.clone());
        }
        let cut_short = state.force_complete(now);
        let snapshot = state.clone();

        if let Some(run_id) = cut_short {
            self.replace_celebration_task(None);
            self.stop_audio(run_id, now, &snapshot);
        }
        self.publish_event(PresentationEvent::Stage {
            stage: SequenceStage::Complete,
            run_id: cut_short,
        });
        self.publish_snapshot(snapshot.clone());
        drop(state);

        match cut_short {
            Some(run_id) => info!("Celebration run {} skipped to completion", run_id),
            None => info!("Skipped to final content"),
        }
        self.record_action("skip");

        Ok(snapshot)
    }

    /// Return to the countdown view with everything reset. `reached` is set
    /// again by the next tick.
    pub fn reset(&self) -> Result<CountdownState, SequencerError> {
        let now = self.now();
        let mut state = self
            .lock_countdown()
            .map_err(SequencerError::StateLock)?;
        self.replace_celebration_task(None);

        let previous = state.clone();
        state.reset();
        let snapshot = state.clone();

        if let Some(run) = previous.run.as_ref() {
            if previous.stage == SequenceStage::Running {
                self.stop_audio(run.id, now, &previous);
            }
        }
        self.publish_event(PresentationEvent::Stage {
            stage: SequenceStage::Idle,
            run_id: None,
        });
        self.publish_snapshot(snapshot.clone());
        drop(state);

        info!("Countdown reset (was {:?})", previous.stage);
        self.record_action("reset");

        Ok(snapshot)
    }

    fn stop_audio(&self, run_id: u64, now: DateTime<Utc>, state: &CountdownState) {
        let offset_ms = state
            .run
            .as_ref()
            .map(|run| (now - run.started_at).num_milliseconds().max(0) as u64)
            .unwrap_or(0);

        self.publish_event(PresentationEvent::Cue {
            run_id,
            cue: "audio-stop".to_string(),
            offset_ms,
            effect: Effect::audio(AudioAction::Stop),
        });
    }

    fn replace_celebration_task(&self, handle: Option<AbortHandle>) {
        match self.celebration_task.lock() {
            Ok(mut task) => {
                if let Some(previous) = std::mem::replace(&mut *task, handle) {
                    previous.abort();
                }
            }
            Err(e) => warn!("Failed to lock celebration task handle: {}", e),
        }
    }

    /// Start the recurring countdown tick, replacing any previous ticker
    pub fn spawn_ticker(self: &Arc<Self>, period: Duration) {
        let handle = tokio::spawn(countdown_ticker_task(Arc::clone(self), period));
        match self.ticker_task.lock() {
            Ok(mut task) => {
                if let Some(previous) = task.replace(handle.abort_handle()) {
                    previous.abort();
                }
            }
            Err(e) => {
                warn!("Failed to lock ticker handle, aborting new ticker: {}", e);
                handle.abort();
            }
        }
    }

    /// Cancel the ticker and any pending celebration cues. Safe to call more
    /// than once.
    pub fn teardown(&self) {
        let ticker = self.ticker_task.lock().ok().and_then(|mut task| task.take());
        let celebration = self.celebration_task.lock().ok().and_then(|mut task| task.take());

        let cancelled = [ticker, celebration]
            .into_iter()
            .flatten()
            .map(|handle| handle.abort())
            .count();

        if cancelled > 0 {
            info!("Cancelled {} background task(s)", cancelled);
        }
    }

    /// Whether a celebration task handle is currently held
    pub fn has_pending_celebration(&self) -> bool {
        self.celebration_task
            .lock()
            .map(|task| task.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
