//! Error types for the registration service.
//!
//! Each collaborator boundary has its own enum. None of them is fatal: the
//! form turns a [`NotificationError`] into a banner, the ticket view turns a
//! [`SnapshotError`] into a text fallback.

use thiserror::Error;

/// Failure of the notification collaborator (email delivery).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The request never reached the provider or the connection broke.
    #[error("Notification transport failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("Notification rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body (provider error text)
        body: String,
    },

    /// The provider did not answer in time.
    #[error("Notification timed out")]
    Timeout,
}

/// Failure while rasterizing staged ticket markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The renderer did not produce an image in time.
    #[error("Snapshot timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The render service could not be reached or refused the request.
    #[error("Render service failed: {0}")]
    Renderer(String),

    /// The renderer answered with bytes that are not a decodable image.
    #[error("Snapshot could not be decoded: {0}")]
    Decode(String),
}

/// Failure while building an export artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The snapshot step failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The PDF document could not be assembled.
    #[error("PDF assembly failed: {0}")]
    Pdf(String),
}

/// Invalid configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        /// Environment variable name
        var: &'static str,
        /// Raw value found
        value: String,
        /// Parser message
        reason: String,
    },

    /// Only some of the variables of a group are set.
    #[error("Incomplete configuration: {0}")]
    Incomplete(String),
}
