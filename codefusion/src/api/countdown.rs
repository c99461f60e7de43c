//! Countdown endpoints.

use super::UnmountGuard;
use crate::countdown::{CountdownAction, CountdownState};
use crate::export::TicketSnapshotter;
use crate::notification::Notifier;
use crate::server::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use codefusion_core::environment::Clock;
use codefusion_web::handlers::{action_stream, SseStep};
use codefusion_web::AppError;
use futures::Stream;
use serde::Serialize;
use std::convert::Infallible;

/// Countdown snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownResponse {
    /// Conference start
    pub starts_at: DateTime<Utc>,
    /// Time left, zeros once started
    pub remaining: CountdownState,
    /// Whether the conference has started
    pub finished: bool,
}

/// Current countdown value.
#[allow(clippy::unused_async)]
pub async fn current<N, S>(State(state): State<AppState<N, S>>) -> Json<CountdownResponse>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let starts_at = state.config.countdown.starts_at;
    let remaining = CountdownState::compute(starts_at, state.clock.now());
    Json(CountdownResponse {
        starts_at,
        finished: remaining.is_none(),
        remaining: remaining.unwrap_or_default(),
    })
}

/// Live countdown: one `tick` event per second, the stream ends once the
/// conference has started. The timer stops when the client disconnects.
///
/// # Errors
///
/// Returns 503 if the timer cannot be started.
pub async fn stream<N, S>(
    State(state): State<AppState<N, S>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>, AppError>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let store = state.countdown_store();
    let rx = store.subscribe_actions();
    let guard = UnmountGuard::new({
        let store = store.clone();
        move || store.unmount()
    });
    store.send(CountdownAction::Start).await?;

    Ok(action_stream(rx, guard, "tick", |action| match action {
        CountdownAction::Updated(remaining) => SseStep::Emit(*remaining),
        CountdownAction::Finished => SseStep::EmitAndClose(CountdownState::default()),
        _ => SseStep::Skip,
    }))
}
