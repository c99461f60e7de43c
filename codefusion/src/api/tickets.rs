//! Ticket endpoints: view, export, share and the standalone page.
//!
//! The browser keeps the issued ticket and posts it back; nothing is looked
//! up server-side.

use super::UnmountGuard;
use crate::export::{ExportOutcome, TicketSnapshotter, TicketViewAction};
use crate::notification::Notifier;
use crate::pages::ticket_page;
use crate::server::state::AppState;
use crate::ticket::{mailto_link, ShareIntent, Ticket, TicketView};
use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use codefusion_web::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the reason a text file replaced the PDF.
pub const EXPORT_FALLBACK_HEADER: &str = "x-export-fallback";

/// Ticket with its display data and links.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketViewResponse {
    /// View model
    pub ticket: TicketView,
    /// Link to the standalone ticket page
    pub page_url: String,
    /// Email share link
    pub mailto: String,
}

/// Render the view model of a ticket.
///
/// # Errors
///
/// Returns an internal error if the page link cannot be built.
pub async fn view_ticket<N, S>(
    State(state): State<AppState<N, S>>,
    Json(ticket): Json<Ticket>,
) -> Result<Json<TicketViewResponse>, AppError>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let page_url = state.page_url(&ticket)?;
    Ok(Json(TicketViewResponse {
        mailto: mailto_link(&ticket, &page_url),
        ticket: state.ticket_view(&ticket),
        page_url,
    }))
}

/// Export a ticket as PDF, or as text when the snapshot fails.
///
/// The response is a file download; a text fallback carries the
/// `X-Export-Fallback` header with the reason.
///
/// # Errors
///
/// - 502 if neither a PDF nor the text fallback could be produced
/// - 504 if the export did not finish in time
pub async fn export_ticket<N, S>(
    State(state): State<AppState<N, S>>,
    Json(ticket): Json<Ticket>,
) -> Result<Response, AppError>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let store = state.ticket_view_store(state.ticket_view(&ticket));
    let _guard = UnmountGuard::new({
        let store = store.clone();
        move || store.unmount()
    });

    let timeout = state.config.export.snapshot_timeout() + Duration::from_secs(5);
    let finished = store
        .send_and_wait_for(
            TicketViewAction::ExportRequested,
            |a| matches!(a, TicketViewAction::ExportFinished(_)),
            timeout,
        )
        .await
        .map_err(|_| AppError::timeout("Ticket export did not finish in time"))?;

    let TicketViewAction::ExportFinished(outcome) = finished else {
        return Err(AppError::internal("Unexpected export result"));
    };

    match outcome {
        ExportOutcome::Pdf { file_name, bytes } => {
            Ok(download(&file_name, "application/pdf", bytes).into_response())
        },
        ExportOutcome::Fallback {
            file_name,
            text,
            reason,
        } => {
            let mut response =
                download(&file_name, "text/plain; charset=utf-8", text.into_bytes()).into_response();
            if let Ok(value) = HeaderValue::from_str(&reason) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(EXPORT_FALLBACK_HEADER), value);
            }
            Ok(response)
        },
        ExportOutcome::Failed { reason } => {
            Err(AppError::bad_gateway("We couldn't export your ticket. Please try again.")
                .with_details(serde_json::json!({ "reason": reason })))
        },
    }
}

fn download(file_name: &str, content_type: &'static str, body: Vec<u8>) -> impl IntoResponse {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        body,
    )
}

/// Share request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    /// Ticket to share
    pub ticket: Ticket,
    /// Whether the browser offers a share sheet
    #[serde(default)]
    pub native_share_available: bool,
}

/// How the browser should share the ticket.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    /// Share sheet or clipboard
    pub intent: ShareIntent,
    /// Email share link
    pub mailto: String,
    /// Notice to display, if any
    pub notice: Option<String>,
}

/// Decide how to share a ticket.
///
/// # Errors
///
/// Returns an error if the page link cannot be built or the store is gone.
pub async fn share_ticket<N, S>(
    State(state): State<AppState<N, S>>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>, AppError>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let page_url = state.page_url(&request.ticket)?;
    let store = state.ticket_view_store(state.ticket_view(&request.ticket));
    let _guard = UnmountGuard::new({
        let store = store.clone();
        move || store.unmount()
    });

    store
        .send(TicketViewAction::ShareRequested {
            page_url,
            native_share_available: request.native_share_available,
        })
        .await?;

    let (intent, mailto, notice) = store
        .state(|s| (s.share.clone(), s.mailto.clone(), s.notice.clone()))
        .await;
    match (intent, mailto) {
        (Some(intent), Some(mailto)) => Ok(Json(ShareResponse {
            intent,
            mailto,
            notice,
        })),
        _ => Err(AppError::internal("Share request produced no intent")),
    }
}

/// Query of the standalone ticket page.
#[derive(Debug, Deserialize)]
pub struct TicketPageQuery {
    /// Ticket as JSON
    pub data: String,
}

/// Standalone ticket page (`GET /ticket?data=<json>`).
///
/// # Errors
///
/// Returns 400 if `data` is not a ticket.
pub async fn ticket_page_handler<N, S>(
    State(state): State<AppState<N, S>>,
    Query(query): Query<TicketPageQuery>,
) -> Result<Html<String>, AppError>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    let ticket: Ticket = serde_json::from_str(&query.data).map_err(|e| {
        AppError::bad_request("Invalid ticket link").with_source(anyhow::Error::new(e))
    })?;
    let page_url = state.page_url(&ticket)?;
    let view = state.ticket_view(&ticket);
    Ok(Html(ticket_page(&view, &mailto_link(&ticket, &page_url))))
}
