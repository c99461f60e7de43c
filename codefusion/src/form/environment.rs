//! Registration form environment.

use crate::config::FormConfig;
use crate::notification::Notifier;
use codefusion_core::environment::{Clock, IdGenerator};
use std::sync::Arc;

/// Collaborators of the registration form.
///
/// # Type Parameters
///
/// - `N`: Notification collaborator
#[derive(Clone)]
pub struct RegistrationEnvironment<N>
where
    N: Notifier + Clone,
{
    /// Notification collaborator
    pub notifier: N,
    /// Clock for the issue date
    pub clock: Arc<dyn Clock>,
    /// Ticket token source
    pub ids: Arc<dyn IdGenerator>,
    /// Organiser address receiving notices
    pub recipient: String,
    /// Avatar ceiling and reveal delay
    pub form: FormConfig,
}

impl<N> RegistrationEnvironment<N>
where
    N: Notifier + Clone,
{
    /// Create an environment.
    #[must_use]
    pub fn new(
        notifier: N,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        recipient: impl Into<String>,
        form: FormConfig,
    ) -> Self {
        Self {
            notifier,
            clock,
            ids,
            recipient: recipient.into(),
            form,
        }
    }
}
