//! Registration form.
//!
//! State machine: `Editing → Submitting → Success`, falling back to
//! `Editing` when the notification fails. A ticket is only built after the
//! notification succeeded, and only from input that passed validation.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;

pub use actions::{FormAction, TextField};
pub use environment::RegistrationEnvironment;
pub use reducer::RegistrationReducer;
pub use state::{FormPhase, FormState};

/// Banner shown when the notification collaborator fails.
pub const SUBMISSION_FAILED_BANNER: &str =
    "We couldn't complete your registration. Please check your connection and try again.";
