//! Registration form state.

use crate::ticket::Ticket;
use crate::validation::{Field, FieldErrors, RegistrationDraft};
use crate::widgets::FileUploadState;

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Accepting input
    #[default]
    Editing,
    /// Waiting for the notification collaborator
    Submitting,
    /// Ticket issued
    Success,
}

/// State of the registration form component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Lifecycle phase
    pub phase: FormPhase,
    /// Entered values, kept across failed submissions
    pub draft: RegistrationDraft,
    /// Schema errors
    pub errors: FieldErrors,
    /// Avatar size error, independent of the schema
    pub avatar_error: Option<String>,
    /// Upload control state
    pub upload: FileUploadState,
    /// Dismissible failure banner
    pub banner: Option<String>,
    /// Issued ticket
    pub ticket: Option<Ticket>,
    /// Whether the ticket view replaced the form
    pub ticket_revealed: bool,
    /// Bumped on unmount; stale effect results are dropped
    pub generation: u64,
}

impl FormState {
    /// Error to display for `field`. The size error wins for the avatar.
    #[must_use]
    pub fn error(&self, field: Field) -> Option<&str> {
        if field == Field::Avatar {
            if let Some(size) = self.avatar_error.as_deref() {
                return Some(size);
            }
        }
        self.errors.get(field)
    }

    /// Every error shown next to a control, the size error included.
    #[must_use]
    pub fn visible_errors(&self) -> FieldErrors {
        let mut errors = self.errors.clone();
        if self.avatar_error.is_some() {
            errors.set(Field::Avatar, self.avatar_error.clone());
        }
        errors
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.phase == FormPhase::Editing
    }

    /// Label of the submit control (progress while submitting).
    #[must_use]
    pub const fn submit_label(&self) -> &'static str {
        match self.phase {
            FormPhase::Editing => "Complete Registration",
            FormPhase::Submitting => "Submitting...",
            FormPhase::Success => "Registered",
        }
    }
}
