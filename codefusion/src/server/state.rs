//! Application state shared by all handlers.
//!
//! Nothing here is per-user: every request builds a fresh store for the
//! component it drives (form, ticket view, countdown) and unmounts it when
//! the response is done.

use crate::config::Config;
use crate::countdown::{CountdownEnvironment, CountdownReducer, CountdownTimerState};
use crate::export::{
    ExportSettings, RenderSurface, TicketSnapshotter, TicketViewEnvironment, TicketViewReducer,
    TicketViewState,
};
use crate::form::{FormState, RegistrationEnvironment, RegistrationReducer};
use crate::notification::Notifier;
use crate::ticket::{ticket_page_url, Ticket, TicketView};
use codefusion_core::environment::{Clock, IdGenerator};
use codefusion_runtime::Store;
use codefusion_web::handlers::{ComponentHealth, HealthStatus, ReadinessProbe};
use codefusion_web::AppError;
use std::sync::Arc;

/// Store driving one registration form.
pub type RegistrationStore<N> =
    Store<FormState, crate::form::FormAction, RegistrationEnvironment<N>, RegistrationReducer<N>>;

/// Store driving one ticket view.
pub type TicketViewStore<S> = Store<
    TicketViewState,
    crate::export::TicketViewAction,
    TicketViewEnvironment<S>,
    TicketViewReducer<S>,
>;

/// Store driving one countdown stream.
pub type CountdownStore = Store<
    CountdownTimerState,
    crate::countdown::CountdownAction,
    CountdownEnvironment,
    CountdownReducer,
>;

/// Application state shared across all HTTP handlers.
///
/// # Type Parameters
///
/// - `N`: Notification collaborator
/// - `S`: Snapshot collaborator
#[derive(Clone)]
pub struct AppState<N, S> {
    /// Notification collaborator
    pub notifier: N,
    /// Snapshot collaborator
    pub snapshotter: S,
    /// Off-screen surface shared by all exports
    pub surface: RenderSurface,
    /// Time source
    pub clock: Arc<dyn Clock>,
    /// Ticket token source
    pub ids: Arc<dyn IdGenerator>,
    /// Loaded configuration
    pub config: Arc<Config>,
}

impl<N, S> AppState<N, S>
where
    N: Notifier + Clone + 'static,
    S: TicketSnapshotter + Clone + 'static,
{
    /// Create the application state.
    #[must_use]
    pub fn new(
        notifier: N,
        snapshotter: S,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        config: Config,
    ) -> Self {
        Self {
            notifier,
            snapshotter,
            surface: RenderSurface::new(),
            clock,
            ids,
            config: Arc::new(config),
        }
    }

    /// Fresh registration form store.
    #[must_use]
    pub fn registration_store(&self) -> RegistrationStore<N> {
        let env = RegistrationEnvironment::new(
            self.notifier.clone(),
            Arc::clone(&self.clock),
            Arc::clone(&self.ids),
            self.config.notification.recipient.clone(),
            self.config.form,
        );
        Store::new(FormState::default(), RegistrationReducer::new(), env)
    }

    /// Fresh ticket view store.
    #[must_use]
    pub fn ticket_view_store(&self, view: TicketView) -> TicketViewStore<S> {
        let env = TicketViewEnvironment {
            snapshotter: self.snapshotter.clone(),
            surface: self.surface.clone(),
            settings: ExportSettings::from(&self.config.export),
        };
        Store::new(TicketViewState::new(view), TicketViewReducer::new(), env)
    }

    /// Fresh countdown store for the configured conference start.
    #[must_use]
    pub fn countdown_store(&self) -> CountdownStore {
        Store::new(
            CountdownTimerState::new(self.config.countdown.starts_at),
            CountdownReducer,
            CountdownEnvironment::new(Arc::clone(&self.clock)),
        )
    }

    /// View model of `ticket` with the configured QR generator.
    #[must_use]
    pub fn ticket_view(&self, ticket: &Ticket) -> TicketView {
        TicketView::new(ticket, &self.config.ticket.qr_base_url)
    }

    /// Public link to the ticket page.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the ticket cannot be serialized.
    pub fn page_url(&self, ticket: &Ticket) -> Result<String, AppError> {
        ticket_page_url(&self.config.server.public_base_url, ticket).map_err(|e| {
            AppError::internal("Failed to build ticket link").with_source(anyhow::Error::new(e))
        })
    }
}

impl<N, S> ReadinessProbe for AppState<N, S>
where
    N: Clone + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    fn readiness(&self) -> Vec<ComponentHealth> {
        let notifier = if self.config.notification.emailjs.is_some() {
            ComponentHealth::new("notifier", HealthStatus::Healthy, "EmailJS")
        } else {
            ComponentHealth::new(
                "notifier",
                HealthStatus::Degraded,
                "console notifier: registrations are logged, not emailed",
            )
        };

        let snapshotter = if self.config.export.render_service_url.is_some() {
            ComponentHealth::new("snapshotter", HealthStatus::Healthy, "render service")
        } else {
            ComponentHealth::new(
                "snapshotter",
                HealthStatus::Degraded,
                "local card snapshotter: PDFs show a plain card",
            )
        };

        let staged = self.surface.staged_count();
        let surface = ComponentHealth::new(
            "render_surface",
            HealthStatus::Healthy,
            format!("{staged} staged nodes"),
        );

        vec![notifier, snapshotter, surface]
    }
}
