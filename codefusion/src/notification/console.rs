//! Console notifier for development.

use super::{Notifier, RegistrationMessage};
use crate::error::NotificationError;
use tracing::info;

/// Logs registration notices instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Create a new console notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    async fn send(&self, message: &RegistrationMessage) -> Result<(), NotificationError> {
        info!(
            to = %message.to_email,
            from_name = %message.from_name,
            from_email = %message.from_email,
            days = %message.days,
            "Registration notice (console notifier)"
        );
        Ok(())
    }
}
