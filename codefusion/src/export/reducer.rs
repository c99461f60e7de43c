//! Ticket view reducer: export and share controls around a rendered ticket.

use super::{export_ticket, ExportOutcome, ExportSettings, RenderSurface, TicketSnapshotter};
use crate::ticket::{mailto_link, share_intent, ShareIntent, TicketView};
use codefusion_core::effect::Effect;
use codefusion_core::reducer::Reducer;
use codefusion_core::{smallvec, SmallVec};
use std::marker::PhantomData;

/// Notice shown when the PDF was replaced by the text summary.
pub const FALLBACK_NOTICE: &str =
    "PDF generation failed, so your ticket was saved as a text file instead.";

/// Notice shown when nothing could be exported.
pub const EXPORT_FAILED_NOTICE: &str = "We couldn't export your ticket. Please try again.";

/// State of a displayed ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketViewState {
    /// Rendered ticket
    pub view: TicketView,
    /// Export in progress; the export control is disabled meanwhile
    pub exporting: bool,
    /// Result of the last export
    pub last_export: Option<ExportOutcome>,
    /// Result of the last share request
    pub share: Option<ShareIntent>,
    /// Email share link of the last share request
    pub mailto: Option<String>,
    /// User-facing notice
    pub notice: Option<String>,
}

impl TicketViewState {
    /// State of a freshly displayed ticket.
    #[must_use]
    pub const fn new(view: TicketView) -> Self {
        Self {
            view,
            exporting: false,
            last_export: None,
            share: None,
            mailto: None,
            notice: None,
        }
    }
}

/// Ticket view actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketViewAction {
    /// The download control was pressed
    ExportRequested,
    /// The export finished (any outcome)
    ExportFinished(ExportOutcome),
    /// The share control was pressed
    ShareRequested {
        /// Link to the ticket page
        page_url: String,
        /// Whether the browser offers a share sheet
        native_share_available: bool,
    },
    /// The notice was dismissed
    NoticeDismissed,
}

/// Collaborators of the ticket view.
#[derive(Clone)]
pub struct TicketViewEnvironment<S>
where
    S: TicketSnapshotter + Clone,
{
    /// Snapshot collaborator
    pub snapshotter: S,
    /// Off-screen surface for staging markup
    pub surface: RenderSurface,
    /// Timeout and fallback policy
    pub settings: ExportSettings,
}

/// Reducer of the ticket view.
#[derive(Debug, Clone, Copy)]
pub struct TicketViewReducer<S> {
    _snapshotter: PhantomData<fn() -> S>,
}

impl<S> TicketViewReducer<S> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _snapshotter: PhantomData,
        }
    }
}

impl<S> Default for TicketViewReducer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Reducer for TicketViewReducer<S>
where
    S: TicketSnapshotter + Clone + 'static,
{
    type State = TicketViewState;
    type Action = TicketViewAction;
    type Environment = TicketViewEnvironment<S>;

    fn reduce(
        &self,
        state: &mut TicketViewState,
        action: TicketViewAction,
        env: &TicketViewEnvironment<S>,
    ) -> SmallVec<[Effect<TicketViewAction>; 4]> {
        match action {
            TicketViewAction::ExportRequested => {
                if state.exporting {
                    tracing::debug!("Export already in progress");
                    return smallvec![Effect::None];
                }
                state.exporting = true;
                state.notice = None;

                let snapshotter = env.snapshotter.clone();
                let surface = env.surface.clone();
                let settings = env.settings;
                let view = state.view.clone();
                smallvec![Effect::future(async move {
                    let outcome = export_ticket(&snapshotter, &surface, &view, settings).await;
                    Some(TicketViewAction::ExportFinished(outcome))
                })]
            },

            TicketViewAction::ExportFinished(outcome) => {
                state.exporting = false;
                state.notice = match &outcome {
                    ExportOutcome::Pdf { .. } => None,
                    ExportOutcome::Fallback { .. } => Some(FALLBACK_NOTICE.to_string()),
                    ExportOutcome::Failed { .. } => Some(EXPORT_FAILED_NOTICE.to_string()),
                };
                state.last_export = Some(outcome);
                smallvec![Effect::None]
            },

            TicketViewAction::ShareRequested {
                page_url,
                native_share_available,
            } => {
                let ticket = &state.view.ticket;
                let intent = share_intent(ticket, &page_url, native_share_available);
                state.notice = match &intent {
                    ShareIntent::Clipboard { notice, .. } => Some(notice.clone()),
                    ShareIntent::Native { .. } => None,
                };
                state.mailto = Some(mailto_link(ticket, &page_url));
                state.share = Some(intent);
                smallvec![Effect::None]
            },

            TicketViewAction::NoticeDismissed => {
                state.notice = None;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::MockSnapshotter;
    use crate::ticket::Ticket;
    use chrono::NaiveDate;
    use codefusion_testing::{assertions, ReducerTest};
    use std::time::Duration;

    fn view() -> TicketView {
        let ticket = Ticket {
            id: "DEV-0001".into(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            profession: "Engineer".into(),
            days: vec!["day1".into()],
            avatar: None,
            issued_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        };
        TicketView::new(&ticket, "https://qr.test/")
    }

    fn env() -> TicketViewEnvironment<MockSnapshotter> {
        TicketViewEnvironment {
            snapshotter: MockSnapshotter::succeeding(),
            surface: RenderSurface::new(),
            settings: ExportSettings {
                snapshot_timeout: Duration::from_millis(200),
                text_fallback: true,
            },
        }
    }

    #[test]
    fn export_disables_the_control() {
        ReducerTest::new(TicketViewReducer::new())
            .with_env(env())
            .given_state(TicketViewState::new(view()))
            .when_action(TicketViewAction::ExportRequested)
            .then_state(|s| assert!(s.exporting))
            .then_effects(|e| assertions::assert_has_future_effect(e))
            .run();
    }

    #[test]
    fn second_export_while_running_is_ignored() {
        ReducerTest::new(TicketViewReducer::new())
            .with_env(env())
            .given_state(TicketViewState::new(view()))
            .given_actions([TicketViewAction::ExportRequested])
            .when_action(TicketViewAction::ExportRequested)
            .then_effects(|e| assertions::assert_no_effects(e))
            .run();
    }

    #[test]
    fn fallback_reenables_export_with_notice() {
        ReducerTest::new(TicketViewReducer::new())
            .with_env(env())
            .given_state(TicketViewState::new(view()))
            .given_actions([TicketViewAction::ExportRequested])
            .when_action(TicketViewAction::ExportFinished(ExportOutcome::Fallback {
                file_name: "codefusion-ticket-DEV-0001.txt".into(),
                text: String::new(),
                reason: "renderer down".into(),
            }))
            .then_state(|s| {
                assert!(!s.exporting);
                assert_eq!(s.notice.as_deref(), Some(FALLBACK_NOTICE));
            })
            .run();
    }

    #[test]
    fn clipboard_share_sets_notice_and_mailto() {
        ReducerTest::new(TicketViewReducer::new())
            .with_env(env())
            .given_state(TicketViewState::new(view()))
            .when_action(TicketViewAction::ShareRequested {
                page_url: "https://codefusion.dev/ticket?data=x".into(),
                native_share_available: false,
            })
            .then_state(|s| {
                assert_eq!(s.notice.as_deref(), Some("Ticket link copied to clipboard!"));
                assert!(s.mailto.as_deref().unwrap().starts_with("mailto:?subject="));
            })
            .run();
    }
}
