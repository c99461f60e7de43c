//! HTML page handlers.

use crate::countdown::CountdownState;
use crate::export::TicketSnapshotter;
use crate::form::FormState;
use crate::notification::Notifier;
use crate::pages::{landing_page, register_page};
use crate::schedule::{SchedulePopupAction, SchedulePopupReducer, SchedulePopupState};
use crate::server::state::AppState;
use axum::{
    extract::{Query, State},
    response::Html,
};
use codefusion_core::reducer::Reducer;
use codefusion_core::environment::Clock;
use serde::Deserialize;

/// Query of the landing page.
#[derive(Debug, Default, Deserialize)]
pub struct LandingQuery {
    /// Day whose schedule popup is open
    pub day: Option<String>,
}

/// Landing page (`GET /`, `GET /?day=day2` opens the schedule popup).
#[allow(clippy::unused_async)]
pub async fn landing<N, S>(
    State(state): State<AppState<N, S>>,
    Query(query): Query<LandingQuery>,
) -> Html<String>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let mut popup = SchedulePopupState::default();
    if let Some(day) = query.day {
        let _ = SchedulePopupReducer.reduce(&mut popup, SchedulePopupAction::Open(day), &());
    }
    let countdown = CountdownState::compute(state.config.countdown.starts_at, state.clock.now());
    Html(landing_page(countdown, &popup))
}

/// Empty registration form (`GET /register`).
#[allow(clippy::unused_async)]
pub async fn register<N, S>(State(state): State<AppState<N, S>>) -> Html<String>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    Html(register_page(
        &FormState::default(),
        state.config.form.avatar_max_bytes,
    ))
}
