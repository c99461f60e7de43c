//! Router configuration.

use super::state::AppState;
use crate::api::{countdown, pages, registrations, schedule, tickets};
use crate::export::TicketSnapshotter;
use crate::notification::Notifier;
use axum::{
    routing::{get, post},
    Router,
};
use codefusion_web::handlers::{health_check, readiness_check};

/// Build the complete router.
///
/// - Health checks: `/health`, `/ready`
/// - Pages: `/`, `/register`, `/ticket`
/// - API under `/api`: registrations, tickets, countdown, schedule
pub fn build_router<N, S>(state: AppState<N, S>) -> Router
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let api_routes = Router::new()
        // Registration form
        .route("/registrations", post(registrations::submit_registration::<N, S>))
        // Ticket view
        .route("/tickets/view", post(tickets::view_ticket::<N, S>))
        .route("/tickets/export", post(tickets::export_ticket::<N, S>))
        .route("/tickets/share", post(tickets::share_ticket::<N, S>))
        // Landing page data
        .route("/countdown", get(countdown::current::<N, S>))
        .route("/countdown/stream", get(countdown::stream::<N, S>))
        .route("/schedule", get(schedule::list_days))
        .route("/schedule/:day", get(schedule::get_day));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check::<AppState<N, S>>))
        .route("/", get(pages::landing::<N, S>))
        .route("/register", get(pages::register::<N, S>))
        .route("/ticket", get(tickets::ticket_page_handler::<N, S>))
        .nest("/api", api_routes)
        .with_state(state)
}
