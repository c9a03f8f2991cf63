//! Patient aggregate
//!
//! A patient owns a prepaid wallet balance and an intake status. Both are
//! mutated only by the payment processor in `domain_billing`; nothing else
//! in the system writes to them after registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Currency, FacilityId, Money, MoneyError, PatientId};

use crate::code::PatientCode;

/// Intake workflow status
///
/// The workflow only ever moves forward; a successful payment pushes the
/// patient to `AwaitingVitals` regardless of how far billing got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientStatus {
    /// Registered, not yet billed or paid
    Processing,
    /// Payment received, waiting for the vitals station
    AwaitingVitals,
    /// With a clinician
    InConsultation,
    /// Visit complete
    Discharged,
}

impl PatientStatus {
    /// Human-readable label used by the clinic workflow screens
    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::Processing => "Processing",
            PatientStatus::AwaitingVitals => "Awaiting Vitals",
            PatientStatus::InConsultation => "In Consultation",
            PatientStatus::Discharged => "Discharged",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A registered patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Unique identifier
    pub id: PatientId,
    /// Facility the patient is registered at
    pub facility_id: FacilityId,
    /// Facility-unique code, e.g. P001
    pub code: PatientCode,
    /// Full name
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Prepaid wallet balance, never negative
    pub wallet_balance: Money,
    /// Intake workflow status
    pub status: PatientStatus,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Creates a new patient in the initial `Processing` state
    pub fn new(
        facility_id: FacilityId,
        code: PatientCode,
        name: impl Into<String>,
        phone: Option<String>,
        opening_balance: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PatientId::new_v7(),
            facility_id,
            code,
            name: name.into(),
            phone,
            wallet_balance: opening_balance,
            status: PatientStatus::Processing,
            created_at,
        }
    }

    /// The currency of the patient's wallet
    pub fn currency(&self) -> Currency {
        self.wallet_balance.currency()
    }

    /// Returns true if the wallet covers the given amount
    pub fn has_wallet_funds(&self, amount: &Money) -> bool {
        self.wallet_balance >= *amount
    }

    /// Deducts from the wallet, clamped at a floor of zero
    ///
    /// The clamp guards against drift under races; callers must still run
    /// the authoritative funds check before applying a wallet payment.
    pub fn debit_wallet(&mut self, amount: &Money) -> Result<(), MoneyError> {
        self.wallet_balance = self.wallet_balance.saturating_sub(amount)?;
        Ok(())
    }

    /// Moves the intake status to `AwaitingVitals`
    pub fn mark_awaiting_vitals(&mut self) {
        self.status = PatientStatus::AwaitingVitals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn test_patient(balance: Money) -> Patient {
        Patient::new(
            FacilityId::new(1),
            PatientCode::from_number(1),
            "Ada Obi",
            None,
            balance,
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_patient_starts_processing() {
        let patient = test_patient(Money::zero(Currency::NGN));
        assert_eq!(patient.status, PatientStatus::Processing);
        assert!(patient.wallet_balance.is_zero());
    }

    #[test]
    fn test_wallet_funds_check() {
        let patient = test_patient(Money::new(dec!(100), Currency::NGN));
        assert!(patient.has_wallet_funds(&Money::new(dec!(100), Currency::NGN)));
        assert!(!patient.has_wallet_funds(&Money::new(dec!(100.01), Currency::NGN)));
    }

    #[test]
    fn test_debit_wallet_clamps_at_zero() {
        let mut patient = test_patient(Money::new(dec!(30), Currency::NGN));
        patient
            .debit_wallet(&Money::new(dec!(50), Currency::NGN))
            .unwrap();
        assert!(patient.wallet_balance.is_zero());
    }

    #[test]
    fn test_status_labels_match_workflow_screens() {
        assert_eq!(PatientStatus::AwaitingVitals.label(), "Awaiting Vitals");
        assert_eq!(PatientStatus::Processing.to_string(), "Processing");
    }

    #[test]
    fn test_mark_awaiting_vitals() {
        let mut patient = test_patient(Money::zero(Currency::NGN));
        patient.mark_awaiting_vitals();
        assert_eq!(patient.status, PatientStatus::AwaitingVitals);
    }
}
