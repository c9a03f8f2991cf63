//! Tests for the patient domain entities and code allocation

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, FacilityId, Money, PatientId};
use domain_patient::{
    allocate_code, Appointment, AppointmentStatus, Patient, PatientCode, PatientStatus,
};

fn facility() -> FacilityId {
    FacilityId::new(1)
}

fn patient_with_balance(balance: Money) -> Patient {
    Patient::new(
        facility(),
        PatientCode::from_number(1),
        "Ngozi Eze",
        Some("+2348012345678".to_string()),
        balance,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    )
}

mod wallet_tests {
    use super::*;

    #[test]
    fn successful_debit_reduces_balance_exactly() {
        let mut patient = patient_with_balance(Money::new(dec!(500), Currency::NGN));
        patient
            .debit_wallet(&Money::new(dec!(123.45), Currency::NGN))
            .unwrap();
        assert_eq!(patient.wallet_balance.amount(), dec!(376.55));
    }

    #[test]
    fn debit_beyond_balance_floors_at_zero() {
        let mut patient = patient_with_balance(Money::new(dec!(10), Currency::NGN));
        patient
            .debit_wallet(&Money::new(dec!(99), Currency::NGN))
            .unwrap();
        assert!(patient.wallet_balance.is_zero());
        assert!(!patient.wallet_balance.is_negative());
    }

    #[test]
    fn funds_check_is_inclusive() {
        let patient = patient_with_balance(Money::new(dec!(250), Currency::NGN));
        assert!(patient.has_wallet_funds(&Money::new(dec!(250), Currency::NGN)));
    }

    #[test]
    fn currency_mismatch_fails_funds_check() {
        let patient = patient_with_balance(Money::new(dec!(250), Currency::NGN));
        assert!(!patient.has_wallet_funds(&Money::new(dec!(1), Currency::USD)));
    }
}

mod code_allocation_tests {
    use super::*;

    #[test]
    fn empty_facility_starts_at_p001() {
        assert_eq!(allocate_code(None, &[]).as_str(), "P001");
    }

    #[test]
    fn allocation_follows_the_latest_registration() {
        let latest = PatientCode::from_number(41);
        let existing: Vec<PatientCode> = (1..=41).map(PatientCode::from_number).collect();
        assert_eq!(allocate_code(Some(&latest), &existing).as_str(), "P042");
    }

    #[test]
    fn collision_recovers_via_full_scan() {
        // Gap: the latest patient carries P005, its successor is taken,
        // and P002 was never issued
        let latest = PatientCode::from_number(5);
        let existing = vec![
            PatientCode::from_number(1),
            PatientCode::from_number(3),
            PatientCode::from_number(5),
            PatientCode::from_number(6),
        ];
        assert_eq!(allocate_code(Some(&latest), &existing).as_str(), "P002");
    }

    #[test]
    fn codes_beyond_999_keep_allocating() {
        let latest = PatientCode::from_number(999);
        let existing = vec![PatientCode::from_number(999)];
        let next = allocate_code(Some(&latest), &existing);
        assert_eq!(next.as_str(), "P1000");
        assert_eq!(next.number(), Some(1000));
    }
}

mod status_tests {
    use super::*;

    #[test]
    fn status_serializes_as_closed_variant() {
        let json = serde_json::to_string(&PatientStatus::AwaitingVitals).unwrap();
        assert_eq!(json, "\"AwaitingVitals\"");
    }

    #[test]
    fn display_uses_workflow_label() {
        assert_eq!(PatientStatus::AwaitingVitals.to_string(), "Awaiting Vitals");
    }
}

mod appointment_tests {
    use super::*;

    #[test]
    fn appointment_belongs_to_its_patient_and_facility() {
        let patient_id = PatientId::new_v7();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let appointment = Appointment::new(facility(), patient_id, now, 20, now);

        assert_eq!(appointment.patient_id, patient_id);
        assert_eq!(appointment.facility_id, facility());
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }
}
