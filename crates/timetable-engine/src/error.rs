//! Error types for timetable-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("User {id} is not a teacher (role: {role})")]
    InvalidRole { id: String, role: String },

    #[error("Duplicate: {0}")]
    Duplicate(String),
}

impl TimetableError {
    /// Shorthand for a `NotFound` error with the given entity kind and id.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        TimetableError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
