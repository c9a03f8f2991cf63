//! Patient code allocation
//!
//! Codes are short human-facing identifiers, unique within a facility,
//! formatted `P###`. Allocation proposes the successor of the most recently
//! created patient's code and falls back to a linear scan of every existing
//! code when the proposal collides (gap or race recovery). Uniqueness holds
//! at allocation time, not under adversarial concurrency; the store's
//! uniqueness constraint is the final arbiter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A facility-unique patient code such as `P001`
///
/// The numeric part is zero-padded to three digits and widens naturally
/// once a facility passes 999 patients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientCode(String);

/// Error parsing a patient code from text
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid patient code: {0}")]
pub struct InvalidPatientCode(String);

impl PatientCode {
    /// Formats a code from its sequence number
    pub fn from_number(n: u32) -> Self {
        Self(format!("P{:03}", n))
    }

    /// The numeric suffix, if the code carries one
    pub fn number(&self) -> Option<u32> {
        self.0.strip_prefix('P').and_then(|n| n.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientCode {
    type Err = InvalidPatientCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = Self(s.to_string());
        if code.number().is_none() {
            return Err(InvalidPatientCode(s.to_string()));
        }
        Ok(code)
    }
}

/// Proposes the next free code for a facility
///
/// `latest` is the code of the most recently created patient; `existing`
/// is the full set of codes already in use at the facility.
pub fn allocate_code(latest: Option<&PatientCode>, existing: &[PatientCode]) -> PatientCode {
    let proposed = latest
        .and_then(PatientCode::number)
        .map(|n| n + 1)
        .unwrap_or(1);

    let candidate = PatientCode::from_number(proposed);
    if !existing.contains(&candidate) {
        return candidate;
    }

    // Collision: scan from the bottom for the first unused number
    let mut n = 1;
    while existing.contains(&PatientCode::from_number(n)) {
        n += 1;
    }
    PatientCode::from_number(n)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn allocated_code_is_never_already_in_use(
            numbers in proptest::collection::hash_set(1u32..200u32, 0..60)
        ) {
            let existing: Vec<PatientCode> =
                numbers.iter().map(|n| PatientCode::from_number(*n)).collect();
            let latest = numbers.iter().max().map(|n| PatientCode::from_number(*n));

            let allocated = allocate_code(latest.as_ref(), &existing);
            prop_assert!(!existing.contains(&allocated));
        }
    }
}
