//! Notification collaborator: tells the organisers about a registration.
//!
//! The form awaits exactly one [`Notifier::send`] per submission and never
//! retries.

pub mod console;
pub mod emailjs;

use crate::config::NotificationConfig;
use crate::error::NotificationError;
use crate::schedule;
use crate::validation::RegistrationDraft;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

pub use console::ConsoleNotifier;
pub use emailjs::EmailJsNotifier;

/// Template variables of a registration notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationMessage {
    /// Organiser address receiving the notice
    pub to_email: String,
    /// Attendee full name
    pub from_name: String,
    /// Attendee email
    pub from_email: String,
    /// Attendee profession
    pub profession: String,
    /// Attended days, comma separated
    pub days: String,
    /// Free-text summary
    pub message: String,
}

impl RegistrationMessage {
    /// Build the notice for a validated draft.
    #[must_use]
    pub fn from_draft(draft: &RegistrationDraft, recipient: &str) -> Self {
        let days = draft
            .days
            .iter()
            .map(|id| schedule::day(id).map_or(id.as_str(), |d| d.label))
            .collect::<Vec<_>>()
            .join(", ");
        let name = draft.full_name();
        let email = draft.email.trim().to_string();
        let profession = draft.profession.trim().to_string();

        let message = format!(
            "New registration:\nName: {name}\nEmail: {email}\nProfession: {profession}\nDays: {days}"
        );

        Self {
            to_email: recipient.to_string(),
            from_name: name,
            from_email: email,
            profession,
            days,
            message,
        }
    }
}

/// Delivers registration notices.
pub trait Notifier: Send + Sync {
    /// Send one notice.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the provider cannot be reached,
    /// rejects the request or does not answer in time.
    fn send(
        &self,
        message: &RegistrationMessage,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Notifier selected from configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredNotifier {
    /// EmailJS REST API
    EmailJs(EmailJsNotifier),
    /// Log only (no credentials configured)
    Console(ConsoleNotifier),
}

impl ConfiguredNotifier {
    /// Pick the notifier for `config`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, reqwest::Error> {
        match &config.emailjs {
            Some(emailjs) => Ok(Self::EmailJs(EmailJsNotifier::new(
                emailjs.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            None => Ok(Self::Console(ConsoleNotifier::new())),
        }
    }

    /// Whether real emails are sent.
    #[must_use]
    pub const fn delivers_email(&self) -> bool {
        matches!(self, Self::EmailJs(_))
    }
}

impl Notifier for ConfiguredNotifier {
    async fn send(&self, message: &RegistrationMessage) -> Result<(), NotificationError> {
        match self {
            Self::EmailJs(n) => n.send(message).await,
            Self::Console(n) => n.send(message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_lists_day_labels() {
        let draft = RegistrationDraft {
            first_name: " Ada ".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            profession: "Engineer".into(),
            days: vec!["day1".into(), "day3".into()],
            ..RegistrationDraft::default()
        };
        let message = RegistrationMessage::from_draft(&draft, "info@codefusion.dev");

        assert_eq!(message.from_name, "Ada Lovelace");
        assert_eq!(message.days, "22 November: Workshops, 24 November: Networking");
        assert!(message.message.starts_with("New registration:\nName: Ada Lovelace"));
    }

    #[test]
    fn console_notifier_without_credentials() {
        let config = crate::config::Config::default();
        let notifier = ConfiguredNotifier::from_config(&config.notification);
        assert!(matches!(notifier, Ok(ConfiguredNotifier::Console(_))));
    }
}
