//! Recurring countdown tick task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::state::{AppState, TickOutcome, Trigger};

/// Background task that recomputes the remaining time every `period`.
///
/// With auto-start on, every tick that finds the target reached while the
/// countdown is idle starts the celebration, so a launch after the target or
/// a reset once it has passed still starts it.
pub async fn countdown_ticker_task(state: Arc<AppState>, period: Duration) {
    info!("Starting countdown ticker every {:?}", period);

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        match state.tick() {
            Ok(TickOutcome::Frozen) => {}
            Ok(_) if state.auto_start_due() => {
                if let Err(e) = state.start_sequence(Trigger::Countdown) {
                    warn!("Countdown reached but celebration did not start: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => error!("Failed to tick countdown: {}", e),
        }
    }
}
