//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

use crate::state::{AppState, CountdownState, PresentationEvent, SequencerError, Trigger};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

type ActionResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Map a rejected transition to a response carrying the current state
fn rejection(state: &AppState, err: SequencerError) -> (StatusCode, Json<ApiResponse>) {
    let status = if err.is_conflict() {
        warn!("Celebration action rejected: {}", err);
        StatusCode::CONFLICT
    } else {
        error!("Celebration action failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ApiResponse::error(err.to_string(), state.get_countdown().ok())))
}

fn start(state: &Arc<AppState>, trigger: Trigger, message: &str) -> ActionResult {
    match state.start_sequence(trigger) {
        Ok(countdown) => {
            info!("Celebration started via {} endpoint", trigger.as_str());
            Ok(Json(ApiResponse::ok(message.to_string(), countdown)))
        }
        Err(e) => Err(rejection(state, e)),
    }
}

/// Handle POST /celebration/start - Visitor starts the celebration
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    start(&state, Trigger::Visitor, "Celebration started")
}

/// Handle POST /celebration/test - Start the celebration in test mode
pub async fn test_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    start(&state, Trigger::Debug, "Test celebration started")
}

/// Handle POST /celebration/skip - Jump to the final content
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    state
        .force_complete()
        .map(|countdown| Json(ApiResponse::ok("Skipped to final content".to_string(), countdown)))
        .map_err(|e| rejection(&state, e))
}

/// Handle POST /celebration/reset - Back to the countdown
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ActionResult {
    state
        .reset()
        .map(|countdown| Json(ApiResponse::ok("Countdown reset".to_string(), countdown)))
        .map_err(|e| rejection(&state, e))
}

/// Handle GET /countdown - Current countdown snapshot
pub async fn countdown_handler(State(state): State<Arc<AppState>>) -> Result<Json<CountdownState>, StatusCode> {
    state.get_countdown().map(Json).map_err(|e| {
        error!("Failed to get countdown state: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Handle GET /status - Countdown snapshot with server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let countdown = match state.get_countdown() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to get countdown state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        countdown,
        auto_start: state.auto_start,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Receive presentation events until the channel closes. A client that falls
/// behind skips the dropped events and carries on from the oldest kept one.
fn presentation_events(rx: broadcast::Receiver<PresentationEvent>) -> impl Stream<Item = PresentationEvent> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Presentation client lagged, {} events dropped", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// Handle GET /events - Server-sent stream of fired cues and stage changes
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Presentation client subscribed to events");

    let events = presentation_events(state.subscribe_events()).filter_map(|event| async move {
        match Event::default().event(event.name()).json_data(&event) {
            Ok(sse) => Some(Ok::<_, Infallible>(sse)),
            Err(e) => {
                warn!("Failed to encode presentation event: {}", e);
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SequenceStage;

    fn running(run_id: u64) -> PresentationEvent {
        PresentationEvent::Stage {
            stage: SequenceStage::Running,
            run_id: Some(run_id),
        }
    }

    #[tokio::test]
    async fn lagging_client_resumes_with_kept_events() {
        let (tx, rx) = broadcast::channel(2);
        for run_id in 1..=4 {
            tx.send(running(run_id)).unwrap();
        }
        drop(tx);

        let received: Vec<PresentationEvent> = presentation_events(rx).collect().await;
        assert_eq!(received, vec![running(3), running(4)]);
    }

    #[tokio::test]
    async fn stream_ends_when_the_channel_closes() {
        let (tx, rx) = broadcast::channel::<PresentationEvent>(4);
        drop(tx);
        assert_eq!(presentation_events(rx).count().await, 0);
    }
}
