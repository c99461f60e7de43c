//! Registration form actions.

use crate::validation::Field;
use crate::widgets::FileUploadEvent;

/// Text controls of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Email address
    Email,
    /// GitHub user name
    Github,
    /// Profession
    Profession,
}

impl TextField {
    /// Validation field of this control.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::FirstName => Field::FirstName,
            Self::LastName => Field::LastName,
            Self::Email => Field::Email,
            Self::Github => Field::Github,
            Self::Profession => Field::Profession,
        }
    }
}

/// Everything that can happen to the form.
///
/// Results of effects carry the `generation` they were started in; results
/// from before an unmount are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    // User input
    /// A text control changed
    TextChanged {
        /// Which control
        field: TextField,
        /// New value
        value: String,
    },
    /// A day checkbox changed
    DayToggled {
        /// Day identifier
        day: String,
        /// New checked state
        checked: bool,
    },
    /// The avatar upload control reported an event
    Upload(FileUploadEvent),
    /// The submit button was pressed
    Submit,
    /// The failure banner was dismissed
    DismissBanner,
    /// The form left the page
    Unmounted,

    // Effect results
    /// The avatar preview read finished
    AvatarPreviewRead {
        /// Upload selection the read belongs to
        selection: u64,
        /// Form generation the read was started in
        generation: u64,
        /// Preview, `None` if the read failed
        data_uri: Option<String>,
    },
    /// The notification collaborator accepted the registration
    NotificationSucceeded {
        /// Form generation of the submission
        generation: u64,
    },
    /// The notification collaborator failed
    NotificationFailed {
        /// Form generation of the submission
        generation: u64,
        /// Error description (logged, not shown)
        reason: String,
    },
    /// The post-success display delay elapsed
    RevealTicket {
        /// Form generation of the submission
        generation: u64,
    },
}
