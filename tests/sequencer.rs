// Integration tests for the sequencer lifecycle.
// Wall-clock time comes from a ManualClock; cue scheduling runs on tokio's
// paused clock so the whole eight-second choreography is simulated.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeZone, Utc};
use festive_countdown::{
    choreography::{Timeline, REVEAL_AFTER},
    state::{
        AppState, CountdownState, PresentationEvent, Remaining, SequenceStage, SequencerError, TickOutcome,
        Trigger,
    },
    utils::{Clock, ManualClock},
};

fn target() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 19, 20, 53, 0).unwrap()
}

fn setup(now: DateTime<Utc>) -> (Arc<ManualClock>, Arc<AppState>) {
    let clock = Arc::new(ManualClock::new(now));
    let state = Arc::new(AppState::new(target(), clock.clone()));
    (clock, state)
}

fn stage(state: &AppState) -> SequenceStage {
    state.get_countdown().unwrap().stage
}

#[test]
fn last_second_before_target() {
    let (clock, state) = setup(target() - chrono::Duration::seconds(1));

    let countdown = state.get_countdown().unwrap();
    assert_eq!(countdown.remaining, Remaining { days: 0, hours: 0, minutes: 0, seconds: 1 });
    assert!(!countdown.reached);

    clock.advance(chrono::Duration::seconds(1));
    assert_eq!(state.tick().unwrap(), TickOutcome::Reached);

    let countdown = state.get_countdown().unwrap();
    assert!(countdown.remaining.is_zero());
    assert!(countdown.reached);

    assert_eq!(state.tick().unwrap(), TickOutcome::AlreadyReached);
}

#[test]
fn decomposition_matches_whole_seconds_left() {
    let (clock, state) = setup(target() - chrono::Duration::milliseconds(3 * 86_400_000 + 12_345_678));
    for _ in 0..5 {
        state.tick().unwrap();
        let countdown = state.get_countdown().unwrap();
        let expected = (countdown.target - clock.now()).num_milliseconds() / 1000;
        assert_eq!(countdown.remaining.total_seconds() as i64, expected);
        assert!(countdown.remaining_ms > 0);
        clock.advance(chrono::Duration::milliseconds(987));
    }
}

#[tokio::test(start_paused = true)]
async fn celebration_completes_after_eight_seconds() {
    let (_clock, state) = setup(target());

    let started = state.start_sequence(Trigger::Visitor).unwrap();
    assert_eq!(started.stage, SequenceStage::Running);

    tokio::time::sleep(REVEAL_AFTER - Duration::from_millis(1)).await;
    assert_eq!(stage(&state), SequenceStage::Running);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let countdown = state.get_countdown().unwrap();
    assert_eq!(countdown.stage, SequenceStage::Complete);

    let run = countdown.run.unwrap();
    assert_eq!(run.trigger, Trigger::Visitor);
    assert_eq!(run.cues_fired as usize, Timeline::celebration().len());
    assert!(run.completed_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn cues_are_published_in_offset_order() {
    let (_clock, state) = setup(target());
    let mut rx = state.subscribe_events();

    state.start_sequence(Trigger::Visitor).unwrap();
    tokio::time::sleep(Duration::from_secs(9)).await;

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    assert!(matches!(
        events.first(),
        Some(PresentationEvent::Stage { stage: SequenceStage::Running, .. })
    ));
    assert!(matches!(
        events.last(),
        Some(PresentationEvent::Stage { stage: SequenceStage::Complete, .. })
    ));

    let offsets: Vec<u64> = events
        .iter()
        .filter_map(|event| match event {
            PresentationEvent::Cue { offset_ms, .. } => Some(*offset_ms),
            _ => None,
        })
        .collect();
    assert_eq!(offsets.len(), Timeline::celebration().len());
    assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(offsets.first(), Some(&0));
    assert_eq!(offsets.last(), Some(&8_000));
}

#[tokio::test(start_paused = true)]
async fn visitor_cannot_start_before_target() {
    let (_clock, state) = setup(target() - chrono::Duration::hours(2));

    let err = state.start_sequence(Trigger::Visitor).unwrap_err();
    assert_eq!(err, SequencerError::NotReached);
    assert_eq!(stage(&state), SequenceStage::Idle);
    assert!(!state.has_pending_celebration());
}

#[tokio::test(start_paused = true)]
async fn debug_start_freezes_the_countdown() {
    let (clock, state) = setup(target() - chrono::Duration::hours(2));

    state.start_sequence(Trigger::Debug).unwrap();
    clock.set(target() + chrono::Duration::minutes(1));

    assert_eq!(state.tick().unwrap(), TickOutcome::Frozen);
    let countdown = state.get_countdown().unwrap();
    assert!(countdown.test_mode);
    assert!(!countdown.reached);
}

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected() {
    let (_clock, state) = setup(target());

    state.start_sequence(Trigger::Visitor).unwrap();
    assert_eq!(
        state.start_sequence(Trigger::Visitor).unwrap_err(),
        SequencerError::AlreadyRunning
    );

    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(
        state.start_sequence(Trigger::Visitor).unwrap_err(),
        SequencerError::AlreadyComplete
    );
}

#[tokio::test(start_paused = true)]
async fn skipping_cancels_pending_cues() {
    let (_clock, state) = setup(target());
    let mut rx = state.subscribe_events();

    state.start_sequence(Trigger::Debug).unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    let skipped = state.force_complete().unwrap();
    assert_eq!(skipped.stage, SequenceStage::Complete);
    let fired = skipped.run.as_ref().unwrap().cues_fired;
    assert!(fired > 0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    let countdown = state.get_countdown().unwrap();
    assert_eq!(countdown.stage, SequenceStage::Complete);
    assert_eq!(countdown.run.unwrap().cues_fired, fired);
    assert!(!state.has_pending_celebration());

    let mut saw_stop = false;
    while let Ok(event) = rx.try_recv() {
        if let PresentationEvent::Cue { cue, .. } = &event {
            saw_stop |= cue == "audio-stop";
            assert_ne!(cue, "reveal");
        }
    }
    assert!(saw_stop);
}

#[tokio::test(start_paused = true)]
async fn reset_after_completion_restores_initial_state() {
    let (_clock, state) = setup(target());

    state.start_sequence(Trigger::Visitor).unwrap();
    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(stage(&state), SequenceStage::Complete);

    let reset = state.reset().unwrap();
    assert!(!reset.reached);
    assert_eq!(reset.stage, SequenceStage::Idle);
    assert_eq!(reset, CountdownState::new(target()));

    // the next tick notices the target has passed
    assert_eq!(state.tick().unwrap(), TickOutcome::Reached);
}

#[tokio::test(start_paused = true)]
async fn reset_before_target_clears_reached() {
    let (clock, state) = setup(target() - chrono::Duration::hours(1));

    state.start_sequence(Trigger::Debug).unwrap();
    state.force_complete().unwrap();

    let reset = state.reset().unwrap();
    assert!(!reset.reached);
    assert!(!reset.test_mode);
    assert_eq!(reset.stage, SequenceStage::Idle);

    assert_eq!(state.tick().unwrap(), TickOutcome::Counting);
    assert_eq!(state.get_countdown().unwrap().remaining.hours, 1);

    clock.advance(chrono::Duration::hours(1));
    assert_eq!(state.tick().unwrap(), TickOutcome::Reached);
}

#[tokio::test(start_paused = true)]
async fn skipping_twice_changes_nothing() {
    let (_clock, state) = setup(target());

    state.force_complete().unwrap();
    let (_, skipped_at) = state.get_last_action();
    let mut rx = state.subscribe_events();
    let mut snapshots = state.watch_countdown();
    snapshots.borrow_and_update();

    let again = state.force_complete().unwrap();
    assert_eq!(again.stage, SequenceStage::Complete);
    assert!(rx.try_recv().is_err());
    assert!(!snapshots.has_changed().unwrap());
    assert_eq!(state.get_last_action(), (Some("skip".to_string()), skipped_at));
}

#[tokio::test(start_paused = true)]
async fn reset_mid_run_stops_the_run() {
    let (_clock, state) = setup(target());

    state.start_sequence(Trigger::Debug).unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    let reset = state.reset().unwrap();
    assert_eq!(reset.stage, SequenceStage::Idle);
    assert!(!reset.test_mode);
    assert!(reset.run.is_none());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(stage(&state), SequenceStage::Idle);
}

#[tokio::test(start_paused = true)]
async fn ticker_auto_starts_on_reaching_target() {
    let clock = Arc::new(ManualClock::new(target() - chrono::Duration::seconds(1)));
    let state = Arc::new(AppState::new(target(), clock.clone()).with_auto_start(true));

    state.spawn_ticker(Duration::from_secs(1));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(stage(&state), SequenceStage::Idle);

    clock.advance(chrono::Duration::seconds(1));
    tokio::time::sleep(Duration::from_secs(1)).await;

    let countdown = state.get_countdown().unwrap();
    assert!(countdown.reached);
    assert_eq!(countdown.stage, SequenceStage::Running);
    assert_eq!(countdown.run.unwrap().trigger, Trigger::Countdown);

    state.teardown();
}

#[tokio::test(start_paused = true)]
async fn auto_start_when_launched_after_target() {
    let clock = Arc::new(ManualClock::new(target() + chrono::Duration::seconds(5)));
    let state = Arc::new(AppState::new(target(), clock.clone()).with_auto_start(true));
    assert!(state.get_countdown().unwrap().reached);

    state.spawn_ticker(Duration::from_secs(1));
    tokio::time::sleep(Duration::from_millis(3_100)).await;

    let countdown = state.get_countdown().unwrap();
    assert_eq!(countdown.stage, SequenceStage::Running);
    assert_eq!(countdown.run.unwrap().trigger, Trigger::Countdown);

    // a completed run is not started again by later ticks
    tokio::time::sleep(Duration::from_secs(10)).await;
    let countdown = state.get_countdown().unwrap();
    assert_eq!(countdown.stage, SequenceStage::Complete);
    assert_eq!(countdown.run.unwrap().id, 1);

    state.teardown();
}

#[tokio::test(start_paused = true)]
async fn auto_start_after_reset_once_target_has_passed() {
    let clock = Arc::new(ManualClock::new(target() - chrono::Duration::hours(1)));
    let state = Arc::new(AppState::new(target(), clock.clone()).with_auto_start(true));
    state.spawn_ticker(Duration::from_secs(1));

    state.start_sequence(Trigger::Debug).unwrap();
    state.force_complete().unwrap();
    clock.set(target() + chrono::Duration::minutes(1));
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(stage(&state), SequenceStage::Complete);

    let reset = state.reset().unwrap();
    assert!(!reset.reached);
    tokio::time::sleep(Duration::from_millis(3_100)).await;

    let countdown = state.get_countdown().unwrap();
    assert!(countdown.reached);
    assert!(!countdown.test_mode);
    assert_eq!(countdown.stage, SequenceStage::Running);
    assert_eq!(countdown.run.unwrap().trigger, Trigger::Countdown);

    state.teardown();
}

#[tokio::test(start_paused = true)]
async fn ticker_without_auto_start_only_marks_reached() {
    let (clock, state) = setup(target() - chrono::Duration::seconds(1));

    state.spawn_ticker(Duration::from_secs(1));
    clock.advance(chrono::Duration::seconds(2));
    tokio::time::sleep(Duration::from_millis(1_100)).await;

    let countdown = state.get_countdown().unwrap();
    assert!(countdown.reached);
    assert_eq!(countdown.stage, SequenceStage::Idle);

    state.teardown();
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_the_ticker_and_is_idempotent() {
    let (clock, state) = setup(target() - chrono::Duration::seconds(5));

    state.spawn_ticker(Duration::from_secs(1));
    tokio::time::sleep(Duration::from_millis(10)).await;

    state.teardown();
    state.teardown();

    clock.advance(chrono::Duration::seconds(60));
    tokio::time::sleep(Duration::from_secs(20)).await;

    let countdown = state.get_countdown().unwrap();
    assert!(!countdown.reached);
    assert_eq!(countdown.remaining.seconds, 5);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_a_running_celebration() {
    let (_clock, state) = setup(target());

    state.start_sequence(Trigger::Visitor).unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;

    state.teardown();
    let before = state.get_countdown().unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;

    let after = state.get_countdown().unwrap();
    assert_eq!(after, before);
    assert_eq!(after.stage, SequenceStage::Running);
    assert!(!state.has_pending_celebration());
}

#[test]
fn ticks_publish_snapshots() {
    let (clock, state) = setup(target() - chrono::Duration::seconds(3));
    let mut rx = state.watch_countdown();

    clock.advance(chrono::Duration::seconds(1));
    state.tick().unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().remaining.seconds, 2);
}
