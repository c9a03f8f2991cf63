//! Patient domain errors

use thiserror::Error;

use core_kernel::{Classify, ErrorKind, PortError};

use crate::code::PatientCode;

/// Errors that can occur in the patient domain
#[derive(Debug, Error)]
pub enum PatientError {
    /// Patient with the given ID was not found in the caller's facility
    #[error("Patient not found: {0}")]
    NotFound(String),

    /// Invalid registration data
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    /// Allocated code was taken by a concurrent registration
    #[error("Patient code {0} is already in use")]
    DuplicateCode(PatientCode),

    /// Store failure
    #[error("Storage error: {0}")]
    Store(#[from] PortError),
}

impl PatientError {
    /// Creates a NotFound error from any ID type
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        PatientError::NotFound(id.to_string())
    }

    /// Creates a Validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        PatientError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: &'static str) -> Self {
        PatientError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }
}

impl Classify for PatientError {
    fn kind(&self) -> ErrorKind {
        match self {
            PatientError::NotFound(_) => ErrorKind::NotFound,
            PatientError::Validation { .. } => ErrorKind::Validation,
            PatientError::DuplicateCode(_) => ErrorKind::Conflict,
            PatientError::Store(_) => ErrorKind::Internal,
        }
    }
}
