//! Tickets and their presentation.
//!
//! A [`Ticket`] is built once per successful registration and never stored:
//! the browser keeps it and posts it back to the view, export and share
//! endpoints.

pub mod qr;
pub mod share;
pub mod view;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use qr::qr_code_url;
pub use share::{mailto_link, share_intent, ticket_page_url, ShareIntent};
pub use view::{initials, render_markup, AvatarDisplay, TicketView};

/// Prefix of every ticket number.
pub const TICKET_NAMESPACE: &str = "DEV-";

/// Prefix of the payload encoded in the entry QR code.
pub const QR_NAMESPACE: &str = "CODEFUSION2025";

/// An issued conference ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Ticket number (`DEV-` followed by a random token)
    pub id: String,
    /// Attendee full name
    pub name: String,
    /// Attendee email
    pub email: String,
    /// Attendee profession
    pub profession: String,
    /// Attended day identifiers
    pub days: Vec<String>,
    /// Profile photo as a `data:` URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Date the ticket was issued
    pub issued_date: NaiveDate,
}

impl Ticket {
    /// Base name of exported files (`codefusion-ticket-<id>`).
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("codefusion-ticket-{}", self.id)
    }
}
