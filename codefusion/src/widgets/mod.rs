//! Field widgets of the registration form.
//!
//! Widgets are pure functions of their inputs: they render an HTML fragment
//! and, where the control has one, compute the value reported upward on
//! change. The only internal state is the file upload's drag-over flag and
//! preview.

pub mod checkbox_group;
pub mod file_upload;
pub mod text_input;

pub use checkbox_group::{day_options, toggle, CheckboxGroup, CheckboxOption};
pub use file_upload::{read_as_data_uri, AvatarFile, FileUpload, FileUploadEvent, FileUploadState};
pub use text_input::{InputType, TextInput};

/// Error paragraph shown under a control, or the description when there is
/// no error.
fn hint(id: &str, description: Option<&str>, error: Option<&str>) -> String {
    use crate::markup::escape;

    match (error, description) {
        (Some(error), _) => format!(
            "<p class=\"field-error\" id=\"{}-error\" role=\"alert\">{}</p>",
            escape(id),
            escape(error)
        ),
        (None, Some(description)) => format!(
            "<p class=\"field-description\" id=\"{}-description\">{}</p>",
            escape(id),
            escape(description)
        ),
        (None, None) => String::new(),
    }
}
