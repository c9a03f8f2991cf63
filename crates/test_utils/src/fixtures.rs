//! Pre-built test fixtures
//!
//! Ready-to-use test data for common entities across the billing engine.
//! Fixtures are consistent and predictable so assertions can use exact
//! values.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{
    Currency, FacilityId, InvoiceId, Money, PatientId, PaymentId, RequestContext, UserId,
};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Naira amount from a decimal
    pub fn ngn(amount: Decimal) -> Money {
        Money::new(amount, Currency::NGN)
    }

    /// Standard consultation fee
    pub fn consultation_fee() -> Money {
        Money::new(dec!(2000), Currency::NGN)
    }

    /// Standard lab fee
    pub fn lab_fee() -> Money {
        Money::new(dec!(1500), Currency::NGN)
    }

    /// Zero naira
    pub fn zero() -> Money {
        Money::zero(Currency::NGN)
    }
}

/// Fixture for request contexts
pub struct ContextFixtures;

impl ContextFixtures {
    /// The development fallback identity (facility 1)
    pub fn facility_one() -> RequestContext {
        RequestContext::development()
    }

    /// A second user at facility 1, for idempotency-window tests
    pub fn facility_one_other_user() -> RequestContext {
        RequestContext::new(FacilityId::new(1), UserId::new())
    }

    /// An identity at a different facility, for scoping tests
    pub fn facility_two() -> RequestContext {
        RequestContext::new(FacilityId::new(2), UserId::new())
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed clinic morning every time-sensitive test starts from
    pub fn clinic_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }
}

/// Fixture for identifiers that exist nowhere in the store
pub struct IdFixtures;

impl IdFixtures {
    pub fn unknown_patient() -> PatientId {
        PatientId::new()
    }

    pub fn unknown_invoice() -> InvoiceId {
        InvoiceId::new()
    }

    pub fn unknown_payment() -> PaymentId {
        PaymentId::new()
    }
}
