//! Shared error classification
//!
//! Domain errors carry their own structured variants; this module defines
//! the cross-domain classification callers rely on to turn a failure into a
//! corrective response. Three kinds are expected, user-facing outcomes;
//! `Internal` is the unrecoverable fourth class and must be logged, never
//! swallowed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input; fixable by correcting the request
    Validation,
    /// Referenced entity absent or outside the caller's facility scope
    NotFound,
    /// Well-formed request that is illegal given current state
    Conflict,
    /// Unexpected failure (store unavailability, invariant breach)
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        };
        write!(f, "{}", name)
    }
}

/// Trait for errors that classify themselves into the shared taxonomy
pub trait Classify {
    fn kind(&self) -> ErrorKind;

    /// Returns true if the caller can repair the request and retry
    fn is_caller_fault(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Internal)
    }
}
