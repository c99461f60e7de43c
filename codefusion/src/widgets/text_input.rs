//! Labelled single-line text input.

use super::hint;
use crate::markup::escape;

/// HTML input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Plain text
    #[default]
    Text,
    /// Email address
    Email,
    /// URL
    Url,
}

impl InputType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Url => "url",
        }
    }
}

/// Text input widget.
///
/// ```
/// use codefusion::widgets::{InputType, TextInput};
///
/// let html = TextInput::new("email", "Email address")
///     .input_type(InputType::Email)
///     .required(true)
///     .value("ada@example.com")
///     .render();
/// assert!(html.contains("type=\"email\""));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextInput<'a> {
    id: &'a str,
    label: &'a str,
    input_type: InputType,
    placeholder: &'a str,
    required: bool,
    description: Option<&'a str>,
    value: &'a str,
    error: Option<&'a str>,
}

impl<'a> TextInput<'a> {
    /// Create an empty, optional text input.
    #[must_use]
    pub const fn new(id: &'a str, label: &'a str) -> Self {
        Self {
            id,
            label,
            input_type: InputType::Text,
            placeholder: "",
            required: false,
            description: None,
            value: "",
            error: None,
        }
    }

    /// Set the input type.
    #[must_use]
    pub const fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Set the placeholder.
    #[must_use]
    pub const fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Mark the field as required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Helper text shown when there is no error.
    #[must_use]
    pub const fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    /// Current value.
    #[must_use]
    pub const fn value(mut self, value: &'a str) -> Self {
        self.value = value;
        self
    }

    /// Validation error; replaces the description.
    #[must_use]
    pub const fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    /// Render the labelled control.
    #[must_use]
    pub fn render(&self) -> String {
        let id = escape(self.id);
        let marker = if self.required {
            " <span class=\"required\">*</span>"
        } else {
            ""
        };
        let invalid = if self.error.is_some() {
            " aria-invalid=\"true\""
        } else {
            ""
        };
        let required = if self.required { " required" } else { "" };

        format!(
            "<div class=\"field\">\n\
             <label for=\"{id}\">{label}{marker}</label>\n\
             <input id=\"{id}\" name=\"{id}\" type=\"{kind}\" placeholder=\"{placeholder}\" value=\"{value}\"{required}{invalid}>\n\
             {hint}\n\
             </div>",
            label = escape(self.label),
            kind = self.input_type.as_str(),
            placeholder = escape(self.placeholder),
            value = escape(self.value),
            hint = hint(self.id, self.description, self.error),
        )
    }
}
