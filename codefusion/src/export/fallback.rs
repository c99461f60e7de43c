//! Plain-text ticket, offered when the PDF cannot be produced.

use crate::ticket::TicketView;
use std::fmt::Write as _;

/// Text summary of a ticket.
#[must_use]
pub fn text_summary(view: &TicketView) -> String {
    let t = &view.ticket;
    let mut text = String::new();

    let _ = writeln!(text, "CodeFusion 2025 Ticket");
    let _ = writeln!(text, "======================");
    let _ = writeln!(text, "Ticket No: {}", t.id);
    let _ = writeln!(text, "Name: {}", t.name);
    let _ = writeln!(text, "Email: {}", t.email);
    let _ = writeln!(text, "Profession: {}", t.profession);
    let _ = writeln!(text);
    let _ = writeln!(text, "Attendance dates:");
    for day in &view.days {
        let _ = writeln!(text, "  - {}: {}", day.date_label, day.theme);
    }
    let _ = writeln!(text);
    let _ = writeln!(text, "Event: {}, {}", view.dates_label, view.venue);
    let _ = writeln!(text, "Entry QR code: {}", view.qr_code_url);
    let _ = writeln!(text, "Issued: {}", t.issued_date.format("%Y-%m-%d"));
    let _ = writeln!(text);
    let _ = writeln!(text, "This ticket is required to enter the venue.");
    text
}
