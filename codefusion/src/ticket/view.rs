//! Ticket view model and markup.

use super::{qr_code_url, Ticket};
use crate::markup::escape;
use crate::schedule::{self, DATES_LABEL, VENUE};
use serde::Serialize;

/// How the attendee is pictured on the ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AvatarDisplay {
    /// Uploaded photo, cropped to a circle
    Image {
        /// Photo `data:` URI
        src: String,
    },
    /// Initials in a circle when no photo was uploaded
    Initials {
        /// One or two letters
        text: String,
    },
}

/// One attended day as printed on the ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLine {
    /// Day identifier
    pub id: &'static str,
    /// Printed date
    pub date_label: &'static str,
    /// Day theme
    pub theme: &'static str,
}

/// Everything needed to display a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    /// The ticket itself
    pub ticket: Ticket,
    /// Attended days, unknown identifiers dropped
    pub days: Vec<DayLine>,
    /// Photo or initials
    pub avatar: AvatarDisplay,
    /// Entry QR-code image URL
    pub qr_code_url: String,
    /// Venue
    pub venue: &'static str,
    /// Conference dates
    pub dates_label: &'static str,
    /// Suggested PDF file name
    pub pdf_file_name: String,
}

impl TicketView {
    /// Build the view of `ticket`.
    #[must_use]
    pub fn new(ticket: &Ticket, qr_base_url: &str) -> Self {
        let days = ticket
            .days
            .iter()
            .filter_map(|id| {
                let day = schedule::day(id);
                if day.is_none() {
                    tracing::warn!(day = %id, ticket = %ticket.id, "Unknown day on ticket");
                }
                day
            })
            .map(|d| DayLine {
                id: d.id,
                date_label: d.date_label,
                theme: d.theme,
            })
            .collect();

        let avatar = match ticket.avatar.as_deref().filter(|src| !src.is_empty()) {
            Some(src) => AvatarDisplay::Image {
                src: src.to_string(),
            },
            None => AvatarDisplay::Initials {
                text: initials(&ticket.name),
            },
        };

        Self {
            ticket: ticket.clone(),
            days,
            avatar,
            qr_code_url: qr_code_url(qr_base_url, ticket),
            venue: VENUE,
            dates_label: DATES_LABEL,
            pdf_file_name: format!("{}.pdf", ticket.file_stem()),
        }
    }
}

/// Up to two upper-case initials of a name (`"Ada Lovelace"` → `"AL"`).
#[must_use]
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let picked = match words.as_slice() {
        [] => return "?".to_string(),
        [only] => vec![*only],
        [first, .., last] => vec![*first, *last],
    };
    picked
        .iter()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Render the ticket card.
///
/// The card carries no buttons; controls live outside it so a snapshot of
/// the card never shows them.
#[must_use]
pub fn render_markup(view: &TicketView) -> String {
    let t = &view.ticket;

    let avatar = match &view.avatar {
        AvatarDisplay::Image { src } => format!(
            "<img class=\"avatar avatar-round\" src=\"{}\" alt=\"Profile\" width=\"64\" height=\"64\">",
            escape(src)
        ),
        AvatarDisplay::Initials { text } => {
            format!("<div class=\"avatar avatar-initials\">{}</div>", escape(text))
        },
    };

    let days: String = view
        .days
        .iter()
        .map(|d| {
            format!(
                "<li data-day=\"{}\">{} &middot; {}</li>",
                d.id,
                escape(d.date_label),
                escape(d.theme)
            )
        })
        .collect();

    format!(
        "<section class=\"ticket\" id=\"ticket-card\" data-ticket=\"{id}\">\n\
         <header><h2>CodeFusion 2025</h2><p>Your ticket is ready!</p>\
         <p class=\"ticket-no\">Ticket No <span>{id}</span></p></header>\n\
         <div class=\"attendee\">{avatar}<div><h3>{name}</h3><p>{profession}</p><p>{email}</p></div></div>\n\
         <div class=\"days\"><h3>Attendance Dates</h3><ul>{days}</ul></div>\n\
         <div class=\"event\"><h3>Event Details</h3><p>{dates}</p><p>{venue}</p></div>\n\
         <div class=\"qr\"><img src=\"{qr}\" alt=\"QR Code\" width=\"120\" height=\"120\">\
         <p>Scan this QR code at the entrance</p></div>\n\
         <footer><p>This ticket is required to enter the venue. Issued {issued}.</p></footer>\n\
         </section>",
        id = escape(&t.id),
        name = escape(&t.name),
        profession = escape(&t.profession),
        email = escape(&t.email),
        dates = escape(view.dates_label),
        venue = escape(view.venue),
        qr = escape(&view.qr_code_url),
        issued = t.issued_date.format("%Y-%m-%d"),
    )
}
