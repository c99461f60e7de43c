//! Conference programme and the schedule popup.
//!
//! The programme is static content. The popup is a small reducer so the
//! landing page can render it open on a given day.

use codefusion_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use serde::Serialize;

/// Venue printed on tickets and the landing page.
pub const VENUE: &str = "Istanbul Congress Center";

/// Conference dates as printed on tickets.
pub const DATES_LABEL: &str = "22-24 November 2025";

/// One slot of the programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Start time (local, `HH:MM`)
    pub time: &'static str,
    /// Session title
    pub title: &'static str,
    /// Speaker, absent for breaks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<&'static str>,
}

/// One conference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConferenceDay {
    /// Identifier used by the registration form (`day1`..`day3`)
    pub id: &'static str,
    /// ISO date
    pub date: &'static str,
    /// Human-readable date
    pub date_label: &'static str,
    /// Checkbox label on the registration form
    pub label: &'static str,
    /// Day theme
    pub theme: &'static str,
    /// One-line summary shown on the day card
    pub summary: &'static str,
    /// Sessions in start order
    pub sessions: &'static [Session],
}

const fn talk(time: &'static str, title: &'static str, speaker: &'static str) -> Session {
    Session {
        time,
        title,
        speaker: Some(speaker),
    }
}

const fn lunch() -> Session {
    Session {
        time: "13:00",
        title: "Lunch Break",
        speaker: None,
    }
}

/// The three conference days.
pub const CONFERENCE_DAYS: [ConferenceDay; 3] = [
    ConferenceDay {
        id: "day1",
        date: "2025-11-22",
        date_label: "22 November 2025",
        label: "22 November: Workshops",
        theme: "New Technologies and Web Trends",
        summary: "New technologies and current web trends",
        sessions: &[
            talk("09:30", "Opening and Introduction", "Organizing Team"),
            talk("10:00", "Web Trends of 2025", "Ayşe Yıldız (Google)"),
            talk("11:30", "Building Applications with Next.js 14", "Mehmet Güler (Freelancer)"),
            lunch(),
            talk("14:00", "Edge Computing and Serverless Architectures", "Emre Korkmaz (Vercel)"),
            talk("15:30", "Cross-Platform Development with React Native", "Zeynep Acar (Trendyol)"),
            talk("17:00", "Closing & Q&A", "All Participants"),
        ],
    },
    ConferenceDay {
        id: "day2",
        date: "2025-11-23",
        date_label: "23 November 2025",
        label: "23 November: Conferences",
        theme: "Backend, APIs and Database Technologies",
        summary: "Backend and data management",
        sessions: &[
            talk("10:00", "Modern API Design: REST vs GraphQL", "Engin Arda (GitHub)"),
            talk("11:30", "High-Performance Backend Architectures with Node.js", "Hatice Doğan (Hepsiburada)"),
            lunch(),
            talk("14:00", "PostgreSQL vs MongoDB", "Murat Keskin (Datarush)"),
            talk("15:30", "Introduction to Microservices and Kubernetes", "Elif Demir (Microsoft)"),
            talk("17:00", "Panel: Team Culture and DevOps", "Guests"),
        ],
    },
    ConferenceDay {
        id: "day3",
        date: "2025-11-24",
        date_label: "24 November 2025",
        label: "24 November: Networking",
        theme: "Career, Accessibility and Hands-on Workshops",
        summary: "Career and hands-on practice",
        sessions: &[
            talk("10:00", "From Junior to Senior: Career Journeys", "Can Yalçın (Software Instructor)"),
            talk("11:30", "Accessibility on the Web (A11y)", "Fatma Çetin (a11y.dev)"),
            lunch(),
            talk("14:00", "Live Coding: Building a Blog Application", "Workshop with Mentors"),
            talk("15:30", "CV Writing and LinkedIn Tips", "HR Panel"),
            talk("17:00", "Certificates & Closing", "Organizing Team"),
        ],
    },
];

/// Look up a day by its identifier.
#[must_use]
pub fn day(id: &str) -> Option<&'static ConferenceDay> {
    CONFERENCE_DAYS.iter().find(|d| d.id == id)
}

/// Popup state: which day's sessions are shown, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulePopupState {
    /// Identifier of the open day
    pub open_day: Option<&'static str>,
}

impl SchedulePopupState {
    /// The open day with its sessions.
    #[must_use]
    pub fn selected(&self) -> Option<&'static ConferenceDay> {
        self.open_day.and_then(day)
    }
}

/// Popup actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulePopupAction {
    /// A day card was clicked
    Open(String),
    /// The dialog was dismissed
    Close,
}

/// Reducer for the schedule popup. Unknown days leave the popup unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulePopupReducer;

impl Reducer for SchedulePopupReducer {
    type State = SchedulePopupState;
    type Action = SchedulePopupAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut SchedulePopupState,
        action: SchedulePopupAction,
        _env: &(),
    ) -> SmallVec<[Effect<SchedulePopupAction>; 4]> {
        match action {
            SchedulePopupAction::Open(id) => {
                if let Some(found) = day(&id) {
                    state.open_day = Some(found.id);
                } else {
                    tracing::debug!(day = %id, "Ignoring unknown schedule day");
                }
            },
            SchedulePopupAction::Close => state.open_day = None,
        }
        smallvec![Effect::None]
    }
}
