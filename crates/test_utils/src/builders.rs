//! Test data builders
//!
//! Builder patterns for constructing test data with sensible defaults,
//! so tests specify only the fields they care about.

use chrono::{DateTime, Utc};
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use core_kernel::{AppointmentId, FacilityId, Money, PatientId};
use domain_billing::{CreateInvoiceRequest, InvoiceItemRequest, UpdateInvoiceRequest};
use domain_patient::{Appointment, Patient, PatientCode};

use crate::fixtures::{MoneyFixtures, TemporalFixtures};

/// Builds a line item request
pub fn line_item(service_name: &str, quantity: i64, unit_price: Decimal) -> InvoiceItemRequest {
    InvoiceItemRequest {
        service_name: service_name.to_string(),
        quantity: Decimal::new(quantity, 0),
        unit_price,
        discount_amount: Decimal::ZERO,
    }
}

/// Builds a line item request with a line-level discount
pub fn discounted_item(
    service_name: &str,
    quantity: i64,
    unit_price: Decimal,
    discount: Decimal,
) -> InvoiceItemRequest {
    InvoiceItemRequest {
        service_name: service_name.to_string(),
        quantity: Decimal::new(quantity, 0),
        unit_price,
        discount_amount: discount,
    }
}

/// Builder for `CreateInvoiceRequest`
pub struct InvoiceRequestBuilder {
    patient_id: PatientId,
    appointment_id: Option<AppointmentId>,
    items: Vec<InvoiceItemRequest>,
    discount_amount: Decimal,
}

impl InvoiceRequestBuilder {
    pub fn for_patient(patient_id: PatientId) -> Self {
        Self {
            patient_id,
            appointment_id: None,
            items: Vec::new(),
            discount_amount: Decimal::ZERO,
        }
    }

    pub fn with_appointment(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    pub fn with_item(mut self, item: InvoiceItemRequest) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount_amount = discount;
        self
    }

    pub fn build(self) -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            patient_id: self.patient_id,
            appointment_id: self.appointment_id,
            items: self.items,
            discount_amount: self.discount_amount,
        }
    }

    /// Builds an update request with the same items and discount
    pub fn build_update(self) -> UpdateInvoiceRequest {
        UpdateInvoiceRequest {
            items: self.items,
            discount_amount: self.discount_amount,
        }
    }
}

/// Builder for `Patient` entities inserted directly through the port
pub struct TestPatientBuilder {
    facility_id: FacilityId,
    code_number: u32,
    name: String,
    phone: Option<String>,
    balance: Money,
    created_at: DateTime<Utc>,
}

impl Default for TestPatientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPatientBuilder {
    pub fn new() -> Self {
        Self {
            facility_id: FacilityId::new(1),
            code_number: 1,
            name: Name().fake(),
            phone: None,
            balance: MoneyFixtures::zero(),
            created_at: TemporalFixtures::clinic_morning(),
        }
    }

    pub fn at_facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = facility_id;
        self
    }

    pub fn with_code_number(mut self, n: u32) -> Self {
        self.code_number = n;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> Patient {
        Patient::new(
            self.facility_id,
            PatientCode::from_number(self.code_number),
            self.name,
            self.phone,
            self.balance,
            self.created_at,
        )
    }
}

/// Builder for `Appointment` entities inserted directly through the port
pub struct TestAppointmentBuilder {
    facility_id: FacilityId,
    patient_id: PatientId,
    start_time: DateTime<Utc>,
    duration_minutes: u32,
}

impl TestAppointmentBuilder {
    pub fn for_patient(patient: &Patient) -> Self {
        Self {
            facility_id: patient.facility_id,
            patient_id: patient.id,
            start_time: TemporalFixtures::clinic_morning(),
            duration_minutes: 30,
        }
    }

    pub fn starting_at(mut self, at: DateTime<Utc>) -> Self {
        self.start_time = at;
        self
    }

    pub fn build(self) -> Appointment {
        Appointment::new(
            self.facility_id,
            self.patient_id,
            self.start_time,
            self.duration_minutes,
            self.start_time,
        )
    }
}
