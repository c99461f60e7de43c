//! Group of checkboxes reporting the full selected set on every change.

use super::hint;
use crate::markup::escape;
use crate::schedule::CONFERENCE_DAYS;

/// One selectable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckboxOption {
    /// Submitted value
    pub value: &'static str,
    /// Visible label
    pub label: &'static str,
}

/// Options for the attendance-day group.
#[must_use]
pub fn day_options() -> Vec<CheckboxOption> {
    CONFERENCE_DAYS
        .iter()
        .map(|d| CheckboxOption {
            value: d.id,
            label: d.label,
        })
        .collect()
}

/// Compute the new selection after one checkbox changed.
///
/// Checking appends the value unless already present; unchecking removes
/// exactly that value. Order of the remaining values is preserved. Values
/// that are not among `options` leave the selection unchanged.
#[must_use]
pub fn toggle(options: &[CheckboxOption], selected: &[String], value: &str, checked: bool) -> Vec<String> {
    if !options.iter().any(|o| o.value == value) {
        return selected.to_vec();
    }

    if checked {
        let mut next = selected.to_vec();
        if !next.iter().any(|v| v == value) {
            next.push(value.to_string());
        }
        next
    } else {
        selected.iter().filter(|v| *v != value).cloned().collect()
    }
}

/// Checkbox group widget.
#[derive(Debug, Clone, Copy)]
pub struct CheckboxGroup<'a> {
    /// Field name
    pub id: &'a str,
    /// Group legend
    pub label: &'a str,
    /// Available options
    pub options: &'a [CheckboxOption],
    /// Currently selected values
    pub selected: &'a [String],
    /// Whether at least one option is required
    pub required: bool,
    /// Validation error
    pub error: Option<&'a str>,
}

impl CheckboxGroup<'_> {
    /// Selection reported upward when `value` is (un)checked.
    #[must_use]
    pub fn change(&self, value: &str, checked: bool) -> Vec<String> {
        toggle(self.options, self.selected, value, checked)
    }

    /// Render the fieldset.
    #[must_use]
    pub fn render(&self) -> String {
        let id = escape(self.id);
        let mut boxes = String::new();
        for (index, option) in self.options.iter().enumerate() {
            let checked = if self.selected.iter().any(|v| v == option.value) {
                " checked"
            } else {
                ""
            };
            boxes.push_str(&format!(
                "<label class=\"checkbox\" for=\"{id}-{index}\">\
                 <input type=\"checkbox\" id=\"{id}-{index}\" name=\"{id}\" value=\"{value}\"{checked}> {label}</label>\n",
                value = escape(option.value),
                label = escape(option.label),
            ));
        }

        let marker = if self.required {
            " <span class=\"required\">*</span>"
        } else {
            ""
        };

        format!(
            "<fieldset class=\"field\" id=\"{id}\">\n<legend>{legend}{marker}</legend>\n{boxes}{hint}\n</fieldset>",
            legend = escape(self.label),
            hint = hint(self.id, None, self.error),
        )
    }
}
