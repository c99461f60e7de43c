//! Configuration management for the registration service.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The server binary loads an optional `.env` file first (see `main.rs`).

use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Default EmailJS REST endpoint.
pub const DEFAULT_EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Default QR-code generator base URL.
pub const DEFAULT_QR_BASE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default avatar ceiling (500 KiB).
pub const DEFAULT_AVATAR_MAX_BYTES: usize = 500 * 1024;

/// Conference opening, 2025-11-22T09:00:00+03:00, as a Unix timestamp.
const CONFERENCE_STARTS_AT_UNIX: i64 = 1_763_791_200;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Notification collaborator configuration
    pub notification: NotificationConfig,
    /// Registration form configuration
    pub form: FormConfig,
    /// Ticket rendering configuration
    pub ticket: TicketConfig,
    /// Ticket export configuration
    pub export: ExportConfig,
    /// Landing page countdown configuration
    pub countdown: CountdownConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Public URL of the site (share links, ticket page links)
    pub public_base_url: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

/// EmailJS credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJsConfig {
    /// EmailJS service identifier
    pub service_id: String,
    /// EmailJS template identifier
    pub template_id: String,
    /// EmailJS public key (sent as `user_id`)
    pub public_key: String,
    /// REST endpoint
    pub endpoint: String,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// EmailJS credentials; `None` selects the console notifier
    pub emailjs: Option<EmailJsConfig>,
    /// Address receiving registration notices
    pub recipient: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Registration form configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormConfig {
    /// Avatar size ceiling in bytes
    pub avatar_max_bytes: usize,
    /// Delay between a successful submission and revealing the ticket
    pub reveal_delay_ms: u64,
}

/// Ticket rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketConfig {
    /// QR-code generator base URL
    pub qr_base_url: String,
}

/// Ticket export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Render service URL; `None` selects the local card snapshotter
    pub render_service_url: Option<String>,
    /// Snapshot timeout in seconds
    pub snapshot_timeout_secs: u64,
    /// Produce a plain-text ticket when the snapshot fails
    pub text_fallback: bool,
}

/// Countdown configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Instant the countdown runs to
    pub starts_at: DateTime<Utc>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an unparsable value or
    /// only part of the EmailJS credentials are provided.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let emailjs = match (
            var("EMAILJS_SERVICE_ID"),
            var("EMAILJS_TEMPLATE_ID"),
            var("EMAILJS_PUBLIC_KEY"),
        ) {
            (Some(service_id), Some(template_id), Some(public_key)) => Some(EmailJsConfig {
                service_id,
                template_id,
                public_key,
                endpoint: var("EMAILJS_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_EMAILJS_ENDPOINT.to_string()),
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::Incomplete(
                    "EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and EMAILJS_PUBLIC_KEY must be set together"
                        .to_string(),
                ));
            },
        };

        let starts_at = match var("CONFERENCE_STARTS_AT") {
            Some(raw) => DateTime::parse_from_rfc3339(&raw)
                .map_err(|e| ConfigError::Invalid {
                    var: "CONFERENCE_STARTS_AT",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?
                .with_timezone(&Utc),
            None => default_conference_start(),
        };

        Ok(Self {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed(&var, "SERVER_PORT", 8080)?,
                public_base_url: var("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| "http://localhost:8080".to_string()),
                shutdown_timeout: parsed(&var, "SHUTDOWN_TIMEOUT_SECS", 10)?,
            },
            notification: NotificationConfig {
                emailjs,
                recipient: var("REGISTRATION_TO_EMAIL")
                    .unwrap_or_else(|| "info@codefusion.dev".to_string()),
                timeout_secs: parsed(&var, "NOTIFICATION_TIMEOUT_SECS", 10)?,
            },
            form: FormConfig {
                avatar_max_bytes: parsed(&var, "AVATAR_MAX_BYTES", DEFAULT_AVATAR_MAX_BYTES)?,
                reveal_delay_ms: parsed(&var, "TICKET_REVEAL_DELAY_MS", 500)?,
            },
            ticket: TicketConfig {
                qr_base_url: var("QR_BASE_URL").unwrap_or_else(|| DEFAULT_QR_BASE_URL.to_string()),
            },
            export: ExportConfig {
                render_service_url: var("RENDER_SERVICE_URL"),
                snapshot_timeout_secs: parsed(&var, "SNAPSHOT_TIMEOUT_SECS", 15)?,
                text_fallback: parsed(&var, "EXPORT_TEXT_FALLBACK", true)?,
            },
            countdown: CountdownConfig { starts_at },
        })
    }

    /// Socket address string to bind to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                public_base_url: "http://localhost:8080".to_string(),
                shutdown_timeout: 10,
            },
            notification: NotificationConfig {
                emailjs: None,
                recipient: "info@codefusion.dev".to_string(),
                timeout_secs: 10,
            },
            form: FormConfig::default(),
            ticket: TicketConfig {
                qr_base_url: DEFAULT_QR_BASE_URL.to_string(),
            },
            export: ExportConfig {
                render_service_url: None,
                snapshot_timeout_secs: 15,
                text_fallback: true,
            },
            countdown: CountdownConfig {
                starts_at: default_conference_start(),
            },
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            avatar_max_bytes: DEFAULT_AVATAR_MAX_BYTES,
            reveal_delay_ms: 500,
        }
    }
}

impl FormConfig {
    /// Reveal delay as a `Duration`.
    #[must_use]
    pub const fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

impl ExportConfig {
    /// Snapshot timeout as a `Duration`.
    #[must_use]
    pub const fn snapshot_timeout(&self) -> Duration {
        Duration::from_secs(self.snapshot_timeout_secs)
    }
}

/// 2025-11-22T09:00:00+03:00
#[must_use]
pub fn default_conference_start() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(CONFERENCE_STARTS_AT_UNIX)
}

fn parsed<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.notification.emailjs.is_none());
        assert_eq!(config.form.avatar_max_bytes, 512_000);
        assert_eq!(config.form.reveal_delay(), Duration::from_millis(500));
        assert!(config.export.text_fallback);
        assert_eq!(
            config.countdown.starts_at,
            DateTime::parse_from_rfc3339("2025-11-22T09:00:00+03:00").unwrap()
        );
    }

    #[test]
    fn emailjs_requires_all_three_ids() {
        let err = Config::from_lookup(lookup(&[("EMAILJS_SERVICE_ID", "svc")])).unwrap_err();
        assert!(matches!(err, ConfigError::Incomplete(_)));

        let config = Config::from_lookup(lookup(&[
            ("EMAILJS_SERVICE_ID", "svc"),
            ("EMAILJS_TEMPLATE_ID", "tpl"),
            ("EMAILJS_PUBLIC_KEY", "key"),
        ]))
        .unwrap();
        let emailjs = config.notification.emailjs.unwrap();
        assert_eq!(emailjs.endpoint, DEFAULT_EMAILJS_ENDPOINT);
    }

    #[test]
    fn unparsable_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SERVER_PORT", .. }));

        let err = Config::from_lookup(lookup(&[("CONFERENCE_STARTS_AT", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "CONFERENCE_STARTS_AT", .. }));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("RENDER_SERVICE_URL", "  ")])).unwrap();
        assert!(config.export.render_service_url.is_none());
    }
}
