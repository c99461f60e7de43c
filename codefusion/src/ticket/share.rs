//! Sharing a ticket: platform share sheet, clipboard fallback, email.

use super::Ticket;
use crate::schedule;
use serde::Serialize;

const SHARE_TITLE: &str = "My CodeFusion 2025 Ticket";

/// What the browser should do when the user presses "share".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ShareIntent {
    /// Open the platform share sheet
    Native {
        /// Share title
        title: String,
        /// Share text
        text: String,
        /// Shared link
        url: String,
    },
    /// Copy the link and tell the user
    Clipboard {
        /// Text to copy
        text: String,
        /// Notice to display afterwards
        notice: String,
    },
}

/// Decide how to share `ticket` given the browser's capabilities.
#[must_use]
pub fn share_intent(ticket: &Ticket, page_url: &str, native_share_available: bool) -> ShareIntent {
    if native_share_available {
        ShareIntent::Native {
            title: SHARE_TITLE.to_string(),
            text: format!("I'm attending CodeFusion 2025 as {}!", ticket.name),
            url: page_url.to_string(),
        }
    } else {
        ShareIntent::Clipboard {
            text: page_url.to_string(),
            notice: "Ticket link copied to clipboard!".to_string(),
        }
    }
}

/// `mailto:` link announcing the ticket.
#[must_use]
pub fn mailto_link(ticket: &Ticket, page_url: &str) -> String {
    let dates: Vec<&str> = ticket
        .days
        .iter()
        .filter_map(|id| schedule::day(id))
        .map(|d| d.date_label)
        .collect();

    let body = format!(
        "I'm attending CodeFusion 2025 as {}!\n\nTicket details:\n- Ticket No: {}\n- Attendance dates: {}\n\nTicket link: {}",
        ticket.name,
        ticket.id,
        dates.join(", "),
        page_url
    );

    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(SHARE_TITLE),
        urlencoding::encode(&body)
    )
}

/// Link to the standalone ticket page carrying the ticket as JSON.
///
/// The photo stays out of the link; the page shows initials instead.
///
/// # Errors
///
/// Returns the serialization error if the ticket cannot be encoded.
pub fn ticket_page_url(base_url: &str, ticket: &Ticket) -> Result<String, serde_json::Error> {
    let shared = Ticket {
        avatar: None,
        ..ticket.clone()
    };
    let data = serde_json::to_string(&shared)?;
    Ok(format!(
        "{}/ticket?data={}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&data)
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use chrono::NaiveDate;

    fn ticket() -> Ticket {
        Ticket {
            id: "DEV-0042".into(),
            name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            profession: "Admiral".into(),
            days: vec!["day1".into(), "day2".into()],
            avatar: None,
            issued_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        }
    }

    #[test]
    fn falls_back_to_clipboard() {
        let intent = share_intent(&ticket(), "https://codefusion.dev/ticket", false);
        assert_eq!(
            intent,
            ShareIntent::Clipboard {
                text: "https://codefusion.dev/ticket".into(),
                notice: "Ticket link copied to clipboard!".into(),
            }
        );
    }

    #[test]
    fn native_share_names_the_attendee() {
        match share_intent(&ticket(), "u", true) {
            ShareIntent::Native { text, .. } => assert!(text.contains("Grace Hopper")),
            other => panic!("expected native share, got {other:?}"),
        }
    }

    #[test]
    fn mailto_lists_ticket_number_and_dates() {
        let link = mailto_link(&ticket(), "https://codefusion.dev/t");
        let body = urlencoding::decode(link.split("&body=").nth(1).unwrap()).unwrap();
        assert!(body.contains("- Ticket No: DEV-0042"));
        assert!(body.contains("22 November 2025, 23 November 2025"));
        assert!(link.starts_with("mailto:?subject=My%20CodeFusion%202025%20Ticket"));
    }

    #[test]
    fn page_url_round_trips_the_ticket() {
        let url = ticket_page_url("http://localhost:8080/", &ticket()).unwrap();
        let data = url.strip_prefix("http://localhost:8080/ticket?data=").unwrap();
        let decoded: Ticket = serde_json::from_str(&urlencoding::decode(data).unwrap()).unwrap();
        assert_eq!(decoded, ticket());
    }

    #[test]
    fn page_url_leaves_the_photo_out() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};

        let photo = format!("data:image/png;base64,{}", STANDARD.encode(vec![7_u8; 500 * 1024]));
        let with_photo = Ticket {
            avatar: Some(photo),
            ..ticket()
        };

        let url = ticket_page_url("https://codefusion.dev", &with_photo).unwrap();
        assert!(url.len() < 1_000, "link is {} bytes", url.len());
        assert!(mailto_link(&with_photo, &url).len() < 2_000);

        let data = url.strip_prefix("https://codefusion.dev/ticket?data=").unwrap();
        let decoded: Ticket = serde_json::from_str(&urlencoding::decode(data).unwrap()).unwrap();
        assert_eq!(decoded.avatar, None);
        assert_eq!(decoded.id, "DEV-0042");
    }
}
