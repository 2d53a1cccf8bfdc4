//! Common types and data structures

use std::fmt;

/// Editable field of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name:",
            FormField::Email => "Email:",
        }
    }
}

/// Validation failure stored after a submit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Name and Email are required!")]
    MissingFields,
}

/// Raw field contents, updated on every keystroke
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
}

impl FormValues {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
        }
    }

    /// Both fields must be non-empty. Contents are taken as-is.
    pub fn validate(&self) -> Result<SubmittedData, FormError> {
        if self.name.is_empty() || self.email.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(SubmittedData {
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}

/// Values accepted by a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedData {
    pub name: String,
    pub email: String,
}

/// Result of the most recent completed submit. A new outcome replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmittedData),
    Rejected(FormError),
}

/// Everything the form component holds between frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FormValues,
    pub loading: bool,
    pub outcome: Option<SubmitOutcome>,
}

impl FormState {
    pub fn submitted(&self) -> Option<&SubmittedData> {
        match &self.outcome {
            Some(SubmitOutcome::Submitted(data)) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FormError> {
        match &self.outcome {
            Some(SubmitOutcome::Rejected(err)) => Some(err),
            _ => None,
        }
    }
}

/// Props handed to the form by its host. They never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormProps {
    pub title: String,
}

impl Default for FormProps {
    fn default() -> Self {
        Self {
            title: crate::constants::FORM_TITLE.to_string(),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Name => f.write_str("name"),
            FormField::Email => f.write_str("email"),
        }
    }
}
