//! Mock notifier recording every notice.

use crate::error::NotificationError;
use crate::notification::{Notifier, RegistrationMessage};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock notifier.
///
/// Records the notices it receives; clones share the record.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<RegistrationMessage>>>,
    failure: Option<NotificationError>,
    latency: Option<Duration>,
}

impl MockNotifier {
    /// Create a notifier that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier that fails every call with `error`.
    #[must_use]
    pub fn failing(error: NotificationError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Answer only after `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Notices received so far.
    #[must_use]
    pub fn sent(&self) -> Vec<RegistrationMessage> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of calls so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.sent().len()
    }
}

impl Notifier for MockNotifier {
    async fn send(&self, message: &RegistrationMessage) -> Result<(), NotificationError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
