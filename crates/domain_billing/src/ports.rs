//! Billing domain ports
//!
//! The `BillingPort` trait defines the store operations the billing engine
//! needs. Reads are plain facility-scoped queries; the two multi-entity
//! writes (`commit_payment`) and the invoice sequence are where the
//! adapter must provide atomicity, because the engine's money invariants
//! ride on them.

use async_trait::async_trait;

use core_kernel::{AppointmentId, DomainPort, FacilityId, InvoiceId, PatientId, PaymentId, PortError};
use domain_patient::Patient;

use crate::invoice::Invoice;
use crate::payment::Payment;

/// Store operations for invoices and payments
#[async_trait]
pub trait BillingPort: DomainPort {
    /// Fetches an invoice with its items within the facility
    async fn get_invoice(
        &self,
        facility_id: FacilityId,
        id: InvoiceId,
    ) -> Result<Option<Invoice>, PortError>;

    /// Persists a new invoice with its items atomically
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;

    /// Replaces a stored invoice (items, totals, status) atomically
    async fn update_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;

    /// The non-Draft invoice billing this appointment, if one exists
    async fn find_billed_invoice_for_appointment(
        &self,
        facility_id: FacilityId,
        patient_id: PatientId,
        appointment_id: AppointmentId,
    ) -> Result<Option<Invoice>, PortError>;

    /// Every invoice of the patient, most recently created first
    async fn list_invoices_for_patient(
        &self,
        facility_id: FacilityId,
        patient_id: PatientId,
    ) -> Result<Vec<Invoice>, PortError>;

    /// Next value of the facility's strictly increasing invoice sequence
    ///
    /// Values are never reissued; a failed finalize consumes its number.
    async fn next_invoice_sequence(&self, facility_id: FacilityId) -> Result<u32, PortError>;

    /// Fetches a payment within the facility
    async fn get_payment(
        &self,
        facility_id: FacilityId,
        id: PaymentId,
    ) -> Result<Option<Payment>, PortError>;

    /// Payments of an invoice, ordered by creation time ascending
    async fn list_payments(
        &self,
        facility_id: FacilityId,
        invoice_id: InvoiceId,
    ) -> Result<Vec<Payment>, PortError>;

    /// Persists a payment together with the mutated invoice and patient
    ///
    /// All three writes commit as one unit or not at all; a partial apply
    /// would corrupt financial state.
    async fn commit_payment(
        &self,
        payment: &Payment,
        invoice: &Invoice,
        patient: &Patient,
    ) -> Result<(), PortError>;
}
