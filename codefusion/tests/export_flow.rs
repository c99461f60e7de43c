//! Ticket export driven through a live store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::NaiveDate;
use codefusion::export::reducer::{EXPORT_FAILED_NOTICE, FALLBACK_NOTICE};
use codefusion::error::SnapshotError;
use codefusion::export::{
    CardSnapshotter, ExportOutcome, ExportSettings, RenderSurface, StagedNode, TicketSnapshotter,
    TicketViewAction, TicketViewEnvironment, TicketViewReducer, TicketViewState,
};
use codefusion::mocks::MockSnapshotter;
use codefusion::ticket::{Ticket, TicketView};
use codefusion_runtime::Store;
use codefusion_testing::init_test_tracing;
use image::RgbImage;
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

type ViewStore<S = MockSnapshotter> =
    Store<TicketViewState, TicketViewAction, TicketViewEnvironment<S>, TicketViewReducer<S>>;

/// Renderer whose capture call blows up.
#[derive(Clone)]
struct PanickingSnapshotter;

impl TicketSnapshotter for PanickingSnapshotter {
    async fn snapshot(&self, _node: &StagedNode) -> Result<RgbImage, SnapshotError> {
        panic!("renderer threw while capturing")
    }
}

fn ticket() -> Ticket {
    Ticket {
        id: "DEV-0007".into(),
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        profession: "Engineer".into(),
        days: vec!["day1".into(), "day2".into()],
        avatar: None,
        issued_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
    }
}

fn store<S>(snapshotter: S, surface: RenderSurface, text_fallback: bool) -> ViewStore<S>
where
    S: TicketSnapshotter + Clone + 'static,
{
    store_for(ticket(), snapshotter, surface, text_fallback)
}

fn store_for<S>(
    ticket: Ticket,
    snapshotter: S,
    surface: RenderSurface,
    text_fallback: bool,
) -> ViewStore<S>
where
    S: TicketSnapshotter + Clone + 'static,
{
    init_test_tracing();
    let env = TicketViewEnvironment {
        snapshotter,
        surface,
        settings: ExportSettings {
            snapshot_timeout: Duration::from_millis(100),
            text_fallback,
        },
    };
    let view = TicketView::new(&ticket, "https://qr.test/");
    Store::new(TicketViewState::new(view), TicketViewReducer::new(), env)
}

async fn export<S>(store: &ViewStore<S>) -> ExportOutcome
where
    S: TicketSnapshotter + Clone + 'static,
{
    let action = store
        .send_and_wait_for(
            TicketViewAction::ExportRequested,
            |a| matches!(a, TicketViewAction::ExportFinished(_)),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
    match action {
        TicketViewAction::ExportFinished(outcome) => outcome,
        other => panic!("unexpected action {other:?}"),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn successful_snapshot_yields_a_pdf() {
    let surface = RenderSurface::new();
    let snapshotter = MockSnapshotter::succeeding();
    let store = store(snapshotter.clone(), surface.clone(), true);

    let ExportOutcome::Pdf { file_name, bytes } = export(&store).await else {
        panic!("expected a PDF");
    };
    assert_eq!(file_name, "codefusion-ticket-DEV-0007.pdf");

    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(document.get_pages().len(), 1);

    assert_eq!(surface.staged_count(), 0);
    assert_eq!(snapshotter.call_count(), 1);
    let (exporting, notice) = store.state(|s| (s.exporting, s.notice.clone())).await;
    assert!(!exporting);
    assert_eq!(notice, None);
}

#[tokio::test]
async fn failed_snapshot_offers_text_summary() {
    let surface = RenderSurface::new();
    let store = store(MockSnapshotter::failing(), surface.clone(), true);

    let ExportOutcome::Fallback {
        file_name, text, ..
    } = export(&store).await
    else {
        panic!("expected a text fallback");
    };
    assert_eq!(file_name, "codefusion-ticket-DEV-0007.txt");
    assert!(text.contains("DEV-0007"));
    assert!(text.contains("Ada Lovelace"));

    assert_eq!(surface.staged_count(), 0);
    let (exporting, notice) = store.state(|s| (s.exporting, s.notice.clone())).await;
    assert!(!exporting);
    assert_eq!(notice.as_deref(), Some(FALLBACK_NOTICE));
}

#[tokio::test]
async fn hanging_snapshot_times_out_and_cleans_up() {
    let surface = RenderSurface::new();
    let store = store(MockSnapshotter::hanging(), surface.clone(), true);

    let outcome = export(&store).await;
    let ExportOutcome::Fallback { reason, .. } = outcome else {
        panic!("expected a text fallback, got {outcome:?}");
    };
    assert!(reason.contains("timed out"), "reason was {reason}");
    assert_eq!(surface.staged_count(), 0);
    assert!(!store.state(|s| s.exporting).await);
}

#[tokio::test]
async fn without_fallback_the_export_fails_visibly() {
    let surface = RenderSurface::new();
    let store = store(MockSnapshotter::failing(), surface.clone(), false);

    let outcome = export(&store).await;
    assert!(matches!(outcome, ExportOutcome::Failed { .. }));
    assert!(!outcome.has_file());
    assert_eq!(surface.staged_count(), 0);
    assert_eq!(
        store.state(|s| s.notice.clone()).await.as_deref(),
        Some(EXPORT_FAILED_NOTICE)
    );
}

#[tokio::test]
async fn export_can_be_retried_after_failure() {
    let surface = RenderSurface::new();
    let snapshotter = MockSnapshotter::failing();
    let store = store(snapshotter.clone(), surface, true);

    export(&store).await;
    export(&store).await;

    assert_eq!(snapshotter.call_count(), 2);
}

#[tokio::test]
async fn panicking_renderer_still_finishes_the_export() {
    let surface = RenderSurface::new();
    let store = store(PanickingSnapshotter, surface.clone(), true);

    let outcome = export(&store).await;
    let ExportOutcome::Fallback { reason, .. } = outcome else {
        panic!("expected a text fallback, got {outcome:?}");
    };
    assert!(reason.contains("panicked"), "reason was {reason}");

    assert_eq!(surface.staged_count(), 0);
    let (exporting, last_export) = store
        .state(|s| (s.exporting, s.last_export.is_some()))
        .await;
    assert!(!exporting);
    assert!(last_export);

    // The store keeps serving exports afterwards.
    assert!(matches!(export(&store).await, ExportOutcome::Fallback { .. }));
}

fn page_text(bytes: &[u8]) -> Vec<String> {
    let document = lopdf::Document::load_mem(bytes).unwrap();
    let page = *document.get_pages().values().next().unwrap();
    let content = lopdf::content::Content::decode(&document.get_page_content(page).unwrap()).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .map(|op| String::from_utf8_lossy(op.operands[0].as_str().unwrap()).into_owned())
        .collect()
}

#[tokio::test]
async fn card_pdf_prints_each_attendee() {
    let grace = Ticket {
        id: "DEV-0008".into(),
        name: "Grace Hopper".into(),
        email: "grace@example.com".into(),
        profession: "Rear Admiral".into(),
        days: vec!["day3".into()],
        ..ticket()
    };

    let mut documents = Vec::new();
    for attendee in [ticket(), grace] {
        let store = store_for(attendee, CardSnapshotter, RenderSurface::new(), false);
        let ExportOutcome::Pdf { bytes, .. } = export(&store).await else {
            panic!("expected a PDF");
        };
        documents.push(bytes);
    }
    assert_ne!(documents[0], documents[1]);

    let ada = page_text(&documents[0]);
    for expected in ["Ticket No DEV-0007", "Ada Lovelace", "Engineer", "AL", "Issued 2025-11-01"] {
        assert!(ada.iter().any(|t| t == expected), "{expected} missing from {ada:?}");
    }
    assert!(ada.iter().any(|t| t.starts_with("23 November 2025")));

    let grace = page_text(&documents[1]);
    for expected in ["Ticket No DEV-0008", "Grace Hopper", "Rear Admiral", "GH"] {
        assert!(grace.iter().any(|t| t == expected), "{expected} missing from {grace:?}");
    }
    assert!(!grace.iter().any(|t| t.contains("Ada")));
}
