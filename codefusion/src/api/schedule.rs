//! Programme endpoints.

use crate::schedule::{self, ConferenceDay, CONFERENCE_DAYS};
use axum::{extract::Path, Json};
use codefusion_web::AppError;

/// All conference days with their sessions.
#[allow(clippy::unused_async)]
pub async fn list_days() -> Json<&'static [ConferenceDay]> {
    let days: &'static [ConferenceDay] = &CONFERENCE_DAYS;
    Json(days)
}

/// One conference day.
///
/// # Errors
///
/// Returns 404 for an unknown day.
#[allow(clippy::unused_async)]
pub async fn get_day(Path(id): Path<String>) -> Result<Json<&'static ConferenceDay>, AppError> {
    schedule::day(&id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("Conference day", &id))
}
