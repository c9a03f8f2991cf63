//! In-memory store adapter
//!
//! `MemoryStore` implements the patient and billing ports over plain maps
//! behind a single reader-writer lock. Every mutating method takes the
//! write lock for its whole body, so each operation observes and produces
//! a consistent snapshot, and `commit_payment` applies its three writes as
//! one unit or not at all. The invoice sequence lives here too: strictly
//! increasing per facility, never reissued, gaps tolerated.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use core_kernel::{
    AppointmentId, DomainPort, FacilityId, InvoiceId, PatientId, PaymentId, PortError,
};
use domain_billing::{BillingPort, Invoice, Payment};
use domain_patient::{Appointment, Patient, PatientCode, PatientPort};

#[derive(Debug, Default)]
struct State {
    patients: HashMap<(FacilityId, PatientId), Patient>,
    appointments: HashMap<(FacilityId, AppointmentId), Appointment>,
    invoices: HashMap<(FacilityId, InvoiceId), Invoice>,
    payments: HashMap<(FacilityId, PaymentId), Payment>,
    invoice_sequences: HashMap<FacilityId, u32>,
}

/// Facility-scoped in-memory store
///
/// Cloning shares the underlying state, matching the connection-pool
/// semantics adapters normally have.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, PortError> {
        self.state
            .read()
            .map_err(|_| PortError::internal("store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, State>, PortError> {
        self.state
            .write()
            .map_err(|_| PortError::internal("store lock poisoned"))
    }
}

impl DomainPort for MemoryStore {}

#[async_trait]
impl PatientPort for MemoryStore {
    async fn get_patient(
        &self,
        facility_id: FacilityId,
        id: PatientId,
    ) -> Result<Option<Patient>, PortError> {
        Ok(self.read()?.patients.get(&(facility_id, id)).cloned())
    }

    async fn latest_patient(&self, facility_id: FacilityId) -> Result<Option<Patient>, PortError> {
        let state = self.read()?;
        Ok(state
            .patients
            .values()
            .filter(|p| p.facility_id == facility_id)
            .max_by_key(|p| (p.created_at, *p.id.as_uuid()))
            .cloned())
    }

    async fn patient_codes(&self, facility_id: FacilityId) -> Result<Vec<PatientCode>, PortError> {
        let state = self.read()?;
        Ok(state
            .patients
            .values()
            .filter(|p| p.facility_id == facility_id)
            .map(|p| p.code.clone())
            .collect())
    }

    async fn insert_patient(&self, patient: &Patient) -> Result<(), PortError> {
        let mut state = self.write()?;
        let duplicate_code = state
            .patients
            .values()
            .any(|p| p.facility_id == patient.facility_id && p.code == patient.code);
        if duplicate_code {
            return Err(PortError::conflict(format!(
                "patient code {} already in use",
                patient.code
            )));
        }

        let key = (patient.facility_id, patient.id);
        if state.patients.contains_key(&key) {
            return Err(PortError::conflict(format!(
                "patient {} already exists",
                patient.id
            )));
        }
        state.patients.insert(key, patient.clone());
        Ok(())
    }

    async fn get_appointment(
        &self,
        facility_id: FacilityId,
        patient_id: PatientId,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, PortError> {
        let state = self.read()?;
        Ok(state
            .appointments
            .get(&(facility_id, id))
            .filter(|a| a.patient_id == patient_id)
            .cloned())
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), PortError> {
        let mut state = self.write()?;
        let key = (appointment.facility_id, appointment.id);
        if state.appointments.contains_key(&key) {
            return Err(PortError::conflict(format!(
                "appointment {} already exists",
                appointment.id
            )));
        }
        state.appointments.insert(key, appointment.clone());
        Ok(())
    }
}

#[async_trait]
impl BillingPort for MemoryStore {
    async fn get_invoice(
        &self,
        facility_id: FacilityId,
        id: InvoiceId,
    ) -> Result<Option<Invoice>, PortError> {
        Ok(self.read()?.invoices.get(&(facility_id, id)).cloned())
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        let mut state = self.write()?;
        let key = (invoice.facility_id, invoice.id);
        if state.invoices.contains_key(&key) {
            return Err(PortError::conflict(format!(
                "invoice {} already exists",
                invoice.id
            )));
        }
        state.invoices.insert(key, invoice.clone());
        Ok(())
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        let mut state = self.write()?;
        let key = (invoice.facility_id, invoice.id);
        if !state.invoices.contains_key(&key) {
            return Err(PortError::not_found("Invoice", invoice.id));
        }
        state.invoices.insert(key, invoice.clone());
        Ok(())
    }

    async fn find_billed_invoice_for_appointment(
        &self,
        facility_id: FacilityId,
        patient_id: PatientId,
        appointment_id: AppointmentId,
    ) -> Result<Option<Invoice>, PortError> {
        let state = self.read()?;
        Ok(state
            .invoices
            .values()
            .filter(|i| {
                i.facility_id == facility_id
                    && i.patient_id == patient_id
                    && i.appointment_id == Some(appointment_id)
                    && !i.status.is_draft()
            })
            .min_by_key(|i| (i.created_at, *i.id.as_uuid()))
            .cloned())
    }

    async fn list_invoices_for_patient(
        &self,
        facility_id: FacilityId,
        patient_id: PatientId,
    ) -> Result<Vec<Invoice>, PortError> {
        let state = self.read()?;
        let mut invoices: Vec<Invoice> = state
            .invoices
            .values()
            .filter(|i| i.facility_id == facility_id && i.patient_id == patient_id)
            .cloned()
            .collect();
        invoices.sort_by_key(|i| std::cmp::Reverse((i.created_at, *i.id.as_uuid())));
        Ok(invoices)
    }

    async fn next_invoice_sequence(&self, facility_id: FacilityId) -> Result<u32, PortError> {
        let mut state = self.write()?;
        let counter = state.invoice_sequences.entry(facility_id).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn get_payment(
        &self,
        facility_id: FacilityId,
        id: PaymentId,
    ) -> Result<Option<Payment>, PortError> {
        Ok(self.read()?.payments.get(&(facility_id, id)).cloned())
    }

    async fn list_payments(
        &self,
        facility_id: FacilityId,
        invoice_id: InvoiceId,
    ) -> Result<Vec<Payment>, PortError> {
        let state = self.read()?;
        let mut payments: Vec<Payment> = state
            .payments
            .values()
            .filter(|p| p.facility_id == facility_id && p.invoice_id == invoice_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| (p.created_at, *p.id.as_uuid()));
        Ok(payments)
    }

    async fn commit_payment(
        &self,
        payment: &Payment,
        invoice: &Invoice,
        patient: &Patient,
    ) -> Result<(), PortError> {
        // One write lock for all three rows: the unit of work either
        // commits completely or leaves the state untouched.
        let mut state = self.write()?;

        let invoice_key = (invoice.facility_id, invoice.id);
        if !state.invoices.contains_key(&invoice_key) {
            return Err(PortError::not_found("Invoice", invoice.id));
        }
        let patient_key = (patient.facility_id, patient.id);
        if !state.patients.contains_key(&patient_key) {
            return Err(PortError::not_found("Patient", patient.id));
        }
        let payment_key = (payment.facility_id, payment.id);
        if state.payments.contains_key(&payment_key) {
            return Err(PortError::conflict(format!(
                "payment {} already exists",
                payment.id
            )));
        }

        state.payments.insert(payment_key, payment.clone());
        state.invoices.insert(invoice_key, invoice.clone());
        state.patients.insert(patient_key, patient.clone());

        tracing::debug!(
            payment_id = %payment.id,
            invoice_id = %invoice.id,
            patient_id = %patient.id,
            "payment unit of work committed"
        );
        Ok(())
    }
}
