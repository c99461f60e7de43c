//! QR-code image URL. Encoding is left to the external generator.

use super::{Ticket, QR_NAMESPACE};

/// Image URL of the entry QR code for `ticket`.
///
/// ```
/// # use codefusion::ticket::{qr_code_url, Ticket};
/// # let ticket = Ticket {
/// #     id: "DEV-4821".into(), name: "Ada Lovelace".into(), email: "ada+conf@example.com".into(),
/// #     profession: "Engineer".into(), days: vec!["day1".into()], avatar: None,
/// #     issued_date: chrono::NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
/// # };
/// assert_eq!(
///     qr_code_url("https://api.qrserver.com/v1/create-qr-code/", &ticket),
///     "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=CODEFUSION2025-DEV-4821-ada%2Bconf%40example.com"
/// );
/// ```
#[must_use]
pub fn qr_code_url(base_url: &str, ticket: &Ticket) -> String {
    format!(
        "{base_url}?size=150x150&data={QR_NAMESPACE}-{}-{}",
        ticket.id,
        urlencoding::encode(&ticket.email)
    )
}
