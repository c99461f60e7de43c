//! Validation rules for the registration form.
//!
//! Every field is checked independently and the first failing rule wins.
//! The avatar size ceiling is not part of the schema; the form applies it
//! separately (see [`avatar_size_error`]).

use crate::widgets::AvatarFile;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Email address
    Email,
    /// GitHub user name (never fails)
    Github,
    /// Profession
    Profession,
    /// Attendance days
    Days,
    /// Profile photo
    Avatar,
}

impl Field {
    /// Field name as used in forms and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Github => "github",
            Self::Profession => "profession",
            Self::Days => "days",
            Self::Avatar => "avatar",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values entered in the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Optional GitHub user name
    pub github: Option<String>,
    /// Profession
    pub profession: String,
    /// Selected day identifiers, in selection order
    pub days: Vec<String>,
    /// Optional profile photo
    pub avatar: Option<AvatarFile>,
}

impl RegistrationDraft {
    /// Full name as printed on the ticket.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Per-field error messages. Fields without an entry are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// No errors at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Error of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Set or clear the error of one field.
    pub fn set(&mut self, field: Field, error: Option<String>) {
        match error {
            Some(message) => {
                self.0.insert(field, message);
            },
            None => {
                self.0.remove(&field);
            },
        }
    }

    /// Number of fields in error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over fields in error.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Check a single field of the draft.
#[must_use]
pub fn validate_field(draft: &RegistrationDraft, field: Field) -> Option<String> {
    match field {
        Field::FirstName => min_length(&draft.first_name, 2)
            .then(|| "First name must be at least 2 characters.".to_string()),
        Field::LastName => min_length(&draft.last_name, 2)
            .then(|| "Last name must be at least 2 characters.".to_string()),
        Field::Email => (!is_valid_email(draft.email.trim()))
            .then(|| "Enter a valid email address.".to_string()),
        Field::Github => None,
        Field::Profession => {
            min_length(&draft.profession, 2).then(|| "Enter your profession.".to_string())
        },
        Field::Days => draft
            .days
            .is_empty()
            .then(|| "Select at least one day.".to_string()),
        Field::Avatar => draft
            .avatar
            .as_ref()
            .filter(|file| file.file_name.trim().is_empty())
            .map(|_| "Upload a valid image file.".to_string()),
    }
}

/// Check every field of the draft.
#[must_use]
pub fn validate(draft: &RegistrationDraft) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for field in [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Github,
        Field::Profession,
        Field::Days,
        Field::Avatar,
    ] {
        errors.set(field, validate_field(draft, field));
    }
    errors
}

/// Side constraint on the avatar: an error naming the limit when the file is
/// larger than `max_bytes`.
#[must_use]
pub fn avatar_size_error(avatar: Option<&AvatarFile>, max_bytes: usize) -> Option<String> {
    avatar
        .filter(|file| file.size() > max_bytes)
        .map(|_| format!("File size must be under {} KB.", max_bytes / 1024))
}

/// `true` when the trimmed value is shorter than `min` characters.
fn min_length(value: &str, min: usize) -> bool {
    value.trim().chars().count() < min
}

/// Validate email format.
///
/// Performs basic email validation:
/// - Must contain exactly one @
/// - Local and domain parts must be non-empty
/// - Domain must contain at least one dot
/// - Basic character validation
///
/// ```
/// use codefusion::validation::is_valid_email;
///
/// assert!(is_valid_email("ada@example.com"));
/// assert!(is_valid_email("ada.lovelace+conf@mail.example.org"));
/// assert!(!is_valid_email("ada@example"));
/// assert!(!is_valid_email("ada@@example.com"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') || local.is_empty() || domain.is_empty() {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    if !local.chars().all(valid_local) || !domain.chars().all(valid_domain) {
        return false;
    }

    domain.split('.').all(|part| !part.is_empty())
}
