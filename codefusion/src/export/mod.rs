//! Ticket export: PDF download with a plain-text fallback.
//!
//! # Flow
//!
//! 1. Render the ticket markup and stage it on the [`RenderSurface`]
//! 2. Snapshot the staged node (bounded by the snapshot timeout; a panicking
//!    renderer counts as a failed snapshot)
//! 3. Unstage the node, whatever the snapshot produced
//! 4. Embed the raster in a single-page PDF, with the snapshotter's caption
//!    printed over it
//! 5. On failure, fall back to a text summary (when enabled)

pub mod fallback;
pub mod pdf;
pub mod reducer;
pub mod snapshot;
pub mod surface;

use crate::config::ExportConfig;
use crate::error::{ExportError, SnapshotError};
use crate::ticket::{render_markup, TicketView};
use futures::FutureExt;
use serde::Serialize;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

pub use fallback::text_summary;
pub use pdf::{build_pdf, TextSpan};
pub use reducer::{TicketViewAction, TicketViewEnvironment, TicketViewReducer, TicketViewState};
pub use snapshot::{
    CardSnapshotter, ConfiguredSnapshotter, RenderServiceSnapshotter, TicketSnapshotter,
};
pub use surface::{RenderSurface, StagedNode};

/// Export settings taken from [`ExportConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSettings {
    /// Upper bound for the snapshot step
    pub snapshot_timeout: Duration,
    /// Whether a text summary replaces a failed PDF
    pub text_fallback: bool,
}

impl From<&ExportConfig> for ExportSettings {
    fn from(config: &ExportConfig) -> Self {
        Self {
            snapshot_timeout: config.snapshot_timeout(),
            text_fallback: config.text_fallback,
        }
    }
}

/// Result of one export attempt.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExportOutcome {
    /// The PDF was produced
    Pdf {
        /// Suggested file name
        file_name: String,
        /// Document bytes
        #[serde(skip)]
        bytes: Vec<u8>,
    },
    /// The snapshot failed; a text summary is offered instead
    Fallback {
        /// Suggested file name
        file_name: String,
        /// Summary text
        text: String,
        /// Why the PDF could not be produced
        reason: String,
    },
    /// Nothing could be produced
    Failed {
        /// Why the export failed
        reason: String,
    },
}

impl ExportOutcome {
    /// Whether a downloadable file was produced.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

impl fmt::Debug for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf { file_name, bytes } => f
                .debug_struct("Pdf")
                .field("file_name", file_name)
                .field("size", &bytes.len())
                .finish(),
            Self::Fallback {
                file_name, reason, ..
            } => f
                .debug_struct("Fallback")
                .field("file_name", file_name)
                .field("reason", reason)
                .finish_non_exhaustive(),
            Self::Failed { reason } => f.debug_struct("Failed").field("reason", reason).finish(),
        }
    }
}

/// Run one export of `view`.
///
/// The staged node is dropped before the PDF is assembled, so the surface is
/// clean on every path including a timed-out snapshot.
pub async fn export_ticket<S>(
    snapshotter: &S,
    surface: &RenderSurface,
    view: &TicketView,
    settings: ExportSettings,
) -> ExportOutcome
where
    S: TicketSnapshotter,
{
    let stem = view.ticket.file_stem();

    let raster = {
        let node = surface.stage(render_markup(view), view.ticket.clone());
        let capture = AssertUnwindSafe(snapshotter.snapshot(&node)).catch_unwind();
        match tokio::time::timeout(settings.snapshot_timeout, capture).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                tracing::error!(ticket = %view.ticket.id, "Renderer panicked during snapshot");
                Err(SnapshotError::Renderer("renderer panicked".to_string()))
            },
            Err(_) => Err(SnapshotError::Timeout(settings.snapshot_timeout)),
        }
    };

    let title = format!("CodeFusion 2025 Ticket {}", view.ticket.id);
    let document = raster
        .map_err(ExportError::from)
        .and_then(|image| build_pdf(&image, &title, &snapshotter.caption(view)));

    match document {
        Ok(bytes) => {
            tracing::info!(ticket = %view.ticket.id, size = bytes.len(), "Ticket exported as PDF");
            metrics::counter!("export.pdf").increment(1);
            ExportOutcome::Pdf {
                file_name: format!("{stem}.pdf"),
                bytes,
            }
        },
        Err(e) if settings.text_fallback => {
            tracing::warn!(ticket = %view.ticket.id, error = %e, "PDF export failed, offering text");
            metrics::counter!("export.fallback").increment(1);
            ExportOutcome::Fallback {
                file_name: format!("{stem}.txt"),
                text: text_summary(view),
                reason: e.to_string(),
            }
        },
        Err(e) => {
            tracing::error!(ticket = %view.ticket.id, error = %e, "Ticket export failed");
            metrics::counter!("export.failed").increment(1);
            ExportOutcome::Failed {
                reason: e.to_string(),
            }
        },
    }
}
