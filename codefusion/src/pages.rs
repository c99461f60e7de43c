//! Server-rendered pages: landing, registration form and ticket.

use crate::countdown::CountdownState;
use crate::form::FormState;
use crate::markup::{escape, page};
use crate::schedule::{SchedulePopupState, CONFERENCE_DAYS, DATES_LABEL, VENUE};
use crate::ticket::{render_markup, TicketView};
use crate::validation::Field;
use crate::widgets::{day_options, CheckboxGroup, FileUpload, InputType, TextInput};
use std::fmt::Write as _;

/// Landing page with countdown, day cards and the schedule popup.
#[must_use]
pub fn landing_page(countdown: Option<CountdownState>, popup: &SchedulePopupState) -> String {
    let mut body = String::new();

    body.push_str(
        "<header><h1>CodeFusion 2025</h1><p>Your CodeFusion 2025 journey starts here!</p>\
         <p>&ldquo;Where ideas joined by code meet.&rdquo;</p></header>\n",
    );

    match countdown {
        Some(left) => {
            let _ = write!(
                body,
                "<section id=\"countdown\" data-stream=\"/api/countdown/stream\">\
                 <h2>Time left until the conference</h2>\
                 <div><span data-unit=\"days\">{}</span> Days</div>\
                 <div><span data-unit=\"hours\">{}</span> Hours</div>\
                 <div><span data-unit=\"minutes\">{}</span> Minutes</div>\
                 <div><span data-unit=\"seconds\">{}</span> Seconds</div></section>\n",
                left.days, left.hours, left.minutes, left.seconds
            );
        },
        None => body.push_str("<section id=\"countdown\"><h2>The conference has started!</h2></section>\n"),
    }

    body.push_str("<a class=\"cta\" href=\"/register\">Register Now</a>\n<section id=\"schedule\"><h2>Programme</h2>\n");
    for day in &CONFERENCE_DAYS {
        let _ = write!(
            body,
            "<a class=\"day-card\" href=\"/?day={id}\"><h3>{label}</h3><p>{summary}</p></a>\n",
            id = day.id,
            label = escape(day.label),
            summary = escape(day.summary),
        );
    }
    body.push_str("</section>\n");

    if let Some(day) = popup.selected() {
        let _ = write!(
            body,
            "<dialog open id=\"schedule-popup\"><h2>{}</h2><p>{}</p><ul>",
            escape(day.date_label),
            escape(day.theme)
        );
        for session in day.sessions {
            let speaker = session
                .speaker
                .map_or_else(String::new, |s| format!(" &middot; {}", escape(s)));
            let _ = write!(
                body,
                "<li><time>{}</time> {}{speaker}</li>",
                session.time,
                escape(session.title)
            );
        }
        body.push_str("</ul><a href=\"/\">Close</a></dialog>\n");
    }

    let _ = write!(
        body,
        "<footer><p>Limited seats available.</p><p>{}, {}</p></footer>",
        escape(DATES_LABEL),
        escape(VENUE)
    );

    page("CodeFusion 2025", &body)
}

/// Registration form page; photos up to `avatar_max_bytes` are accepted.
#[must_use]
pub fn register_page(form: &FormState, avatar_max_bytes: usize) -> String {
    let draft = &form.draft;
    let mut body = String::from("<h1>Register for CodeFusion 2025</h1>\n");

    if let Some(banner) = &form.banner {
        let _ = write!(
            body,
            "<div class=\"banner\" role=\"alert\">{}<button type=\"button\" data-action=\"dismiss\">&times;</button></div>\n",
            escape(banner)
        );
    }

    body.push_str("<form id=\"registration\" method=\"post\" action=\"/api/registrations\" enctype=\"multipart/form-data\" novalidate>\n");

    let inputs = [
        TextInput::new("firstName", "First Name")
            .placeholder("Your first name")
            .required(true)
            .value(&draft.first_name)
            .error(form.error(Field::FirstName)),
        TextInput::new("lastName", "Last Name")
            .placeholder("Your last name")
            .required(true)
            .value(&draft.last_name)
            .error(form.error(Field::LastName)),
        TextInput::new("email", "Email")
            .input_type(InputType::Email)
            .placeholder("example@mail.com")
            .required(true)
            .description("Your ticket will be sent to this address")
            .value(&draft.email)
            .error(form.error(Field::Email)),
        TextInput::new("github", "GitHub Username")
            .placeholder("@username")
            .value(draft.github.as_deref().unwrap_or_default())
            .error(form.error(Field::Github)),
        TextInput::new("profession", "Profession")
            .placeholder("Frontend Developer, Student...")
            .required(true)
            .value(&draft.profession)
            .error(form.error(Field::Profession)),
    ];
    for input in inputs {
        body.push_str(&input.render());
        body.push('\n');
    }

    let options = day_options();
    body.push_str(
        &CheckboxGroup {
            id: "days",
            label: "Which days will you attend?",
            options: &options,
            selected: &draft.days,
            required: true,
            error: form.error(Field::Days),
        }
        .render(),
    );
    body.push('\n');

    body.push_str(
        &FileUpload {
            id: "avatar",
            label: "Profile Photo",
            description: "Drag and drop your photo here or click to browse",
            accept: "image/png, image/jpeg",
            required: false,
            error: form.error(Field::Avatar),
            max_bytes: avatar_max_bytes,
            state: &form.upload,
        }
        .render(),
    );

    let disabled = if form.submit_enabled() { "" } else { " disabled" };
    let _ = write!(
        body,
        "\n<button type=\"submit\"{disabled}>{}</button>\n</form>",
        form.submit_label()
    );

    page("Register | CodeFusion 2025", &body)
}

/// Standalone ticket page. The controls sit outside the ticket card.
#[must_use]
pub fn ticket_page(view: &TicketView, mailto: &str) -> String {
    let body = format!(
        "{card}\n<div class=\"ticket-actions\">\
         <button type=\"button\" data-action=\"download\" data-file=\"{file}\">Download PDF</button>\
         <button type=\"button\" data-action=\"share\">Share</button>\
         <a class=\"button\" href=\"{mailto}\">Send by Email</a></div>",
        card = render_markup(view),
        file = escape(&view.pdf_file_name),
        mailto = escape(mailto),
    );
    page(&format!("Ticket {} | CodeFusion 2025", view.ticket.id), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SUBMISSION_FAILED_BANNER;
    use crate::form::FormPhase;

    #[test]
    fn landing_shows_countdown_and_open_day() {
        let html = landing_page(
            Some(CountdownState {
                days: 3,
                hours: 2,
                minutes: 1,
                seconds: 0,
            }),
            &SchedulePopupState {
                open_day: Some("day2"),
            },
        );
        assert!(html.contains("<span data-unit=\"days\">3</span>"));
        assert!(html.contains("<dialog open id=\"schedule-popup\"><h2>23 November 2025</h2>"));
        assert!(html.contains("Lunch Break"));
    }

    #[test]
    fn landing_after_start_has_no_popup() {
        let html = landing_page(None, &SchedulePopupState::default());
        assert!(html.contains("The conference has started!"));
        assert!(!html.contains("<dialog"));
    }

    #[test]
    fn register_page_keeps_values_and_banner() {
        let mut form = FormState::default();
        form.draft.first_name = "Ada".into();
        form.banner = Some(SUBMISSION_FAILED_BANNER.into());
        let html = register_page(&form, 512_000);
        assert!(html.contains("value=\"Ada\""));
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("Complete Registration"));

        form.phase = FormPhase::Submitting;
        assert!(register_page(&form, 512_000).contains("<button type=\"submit\" disabled>Submitting...</button>"));
    }
}
