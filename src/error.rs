//! Domain errors for request workflows. Store and CLI code wrap these in `anyhow`.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PortalError {
    /// A form field failed validation; `field` names the input the message belongs to.
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Course {0} is not on this academic record")]
    UnknownCourse(String),

    #[error("Course {code} cannot be appealed while {status}")]
    NotAppealable { code: String, status: String },
}

impl PortalError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
