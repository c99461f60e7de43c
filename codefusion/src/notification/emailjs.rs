//! EmailJS REST notifier.
//!
//! Posts `{service_id, template_id, user_id, template_params}` to the
//! EmailJS send endpoint. EmailJS answers `200 OK` with a plain-text body on
//! success and a non-2xx status with an error message otherwise.

use super::{Notifier, RegistrationMessage};
use crate::config::EmailJsConfig;
use crate::error::NotificationError;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Request body of the EmailJS send endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a RegistrationMessage,
}

/// Notifier backed by the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsNotifier {
    client: reqwest::Client,
    config: EmailJsConfig,
}

impl EmailJsNotifier {
    /// Create a notifier with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be built.
    pub fn new(config: EmailJsConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    /// Endpoint the notifier posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

impl Notifier for EmailJsNotifier {
    async fn send(&self, message: &RegistrationMessage) -> Result<(), NotificationError> {
        let body = SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: message,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotificationError::Timeout
                } else {
                    NotificationError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(status = %status, "EmailJS accepted registration notice");
            metrics::counter!("notification.sent").increment(1);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "EmailJS rejected registration notice");
        metrics::counter!("notification.rejected").increment(1);
        Err(NotificationError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
