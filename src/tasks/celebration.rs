//! Celebration choreography task

use std::sync::Arc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use crate::{choreography::Timeline, state::AppState};

/// Walk `timeline` for run `run_id`, firing each entry at `started + offset`.
///
/// Entries are scheduled against the run start rather than the previous
/// entry, so a late wake-up fires everything that became due in order and
/// never shifts the later offsets. The task stops early once the run is no
/// longer current.
pub async fn celebration_task(state: Arc<AppState>, run_id: u64, started: Instant, mut timeline: Timeline) {
    if timeline.is_empty() {
        debug!("Celebration run {} has no cues", run_id);
        return;
    }
    info!("Starting celebration run {} with {} cues", run_id, timeline.len());

    while let Some(next) = timeline.next_offset() {
        sleep_until(started + next).await;

        let elapsed = started.elapsed().max(next);
        for entry in timeline.due(elapsed) {
            match state.fire_cue(run_id, entry) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Celebration run {} is no longer current, stopping", run_id);
                    return;
                }
                Err(e) => error!("Failed to fire cue {} of run {}: {}", entry.cue, run_id, e),
            }
        }
    }

    debug!("Celebration run {} fired all {} cues", run_id, timeline.fired());
}
