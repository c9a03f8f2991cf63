//! Invoice aggregate and status state machine
//!
//! An invoice is priced at creation, frozen at finalize, and advanced by
//! payments. Status transitions are methods returning `Result`, so an
//! illegal move is an error value rather than a silently ignored write.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{AppointmentId, FacilityId, InvoiceId, Money, PatientId, UserId};

use crate::error::BillingError;
use crate::pricing::PricedInvoice;

/// Invoice status
///
/// Legal transitions: `Draft -> Finalized -> {PartiallyPaid, Paid}` with
/// `PartiallyPaid -> Paid` as payments accumulate. `Paid` is terminal and
/// nothing ever returns to `Draft` or `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// Being drafted; items still replaceable
    Draft,
    /// Numbered and frozen, awaiting payment
    Finalized,
    /// Partial payment received
    PartiallyPaid,
    /// Fully paid
    Paid,
}

impl InvoiceStatus {
    pub fn is_draft(&self) -> bool {
        matches!(self, InvoiceStatus::Draft)
    }

    /// Returns true if payments may be applied in this status
    pub fn accepts_payment(&self) -> bool {
        matches!(self, InvoiceStatus::Finalized | InvoiceStatus::PartiallyPaid)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Finalized => "Finalized",
            InvoiceStatus::PartiallyPaid => "PartiallyPaid",
            InvoiceStatus::Paid => "Paid",
        };
        write!(f, "{}", name)
    }
}

/// A line item on an invoice
///
/// Owned exclusively by its invoice; a Draft edit destroys and recreates
/// the whole set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Item ID
    pub id: Uuid,
    /// Billed service
    pub service_name: String,
    /// Quantity, strictly positive
    pub quantity: rust_decimal::Decimal,
    /// Price per unit
    pub unit_price: Money,
    /// Line-level discount
    pub discount_amount: Money,
    /// quantity x unit price - discount, rounded
    pub line_total: Money,
}

/// An invoice for a patient's care
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Facility scope
    pub facility_id: FacilityId,
    /// Patient being billed
    pub patient_id: PatientId,
    /// The visit this invoice bills, if any
    pub appointment_id: Option<AppointmentId>,
    /// Human-readable number, assigned only on finalize
    pub invoice_number: Option<String>,
    /// Status
    pub status: InvoiceStatus,
    /// Sum of line totals
    pub subtotal: Money,
    /// Invoice-level discount
    pub discount_amount: Money,
    /// subtotal - discount, rounded, never negative
    pub total: Money,
    /// Line items
    pub items: Vec<InvoiceItem>,
    /// User who created the invoice
    pub created_by: UserId,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// When the invoice was finalized
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Creates a new Draft invoice from priced items
    pub fn draft(
        facility_id: FacilityId,
        patient_id: PatientId,
        appointment_id: Option<AppointmentId>,
        priced: PricedInvoice,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: InvoiceId::new_v7(),
            facility_id,
            patient_id,
            appointment_id,
            invoice_number: None,
            status: InvoiceStatus::Draft,
            subtotal: priced.subtotal,
            discount_amount: priced.discount_amount,
            total: priced.total,
            items: priced.items,
            created_by,
            created_at,
            finalized_at: None,
        }
    }

    /// Replaces the entire item set and retotals; Draft only
    pub fn replace_items(&mut self, priced: PricedInvoice) -> Result<(), BillingError> {
        if !self.status.is_draft() {
            return Err(BillingError::NotDraft {
                action: "updated",
                status: self.status,
            });
        }
        self.items = priced.items;
        self.subtotal = priced.subtotal;
        self.discount_amount = priced.discount_amount;
        self.total = priced.total;
        Ok(())
    }

    /// Assigns the invoice number and freezes edits; Draft only
    pub fn finalize(
        &mut self,
        invoice_number: String,
        at: DateTime<Utc>,
    ) -> Result<(), BillingError> {
        if !self.status.is_draft() {
            return Err(BillingError::NotDraft {
                action: "finalized",
                status: self.status,
            });
        }
        self.invoice_number = Some(invoice_number);
        self.status = InvoiceStatus::Finalized;
        self.finalized_at = Some(at);
        Ok(())
    }

    /// Advances the status for a new cumulative paid amount
    ///
    /// Legal only once the invoice accepts payments; the caller validates
    /// that the new sum does not exceed the total.
    pub fn record_payment_total(&mut self, new_total_paid: Money) -> Result<(), BillingError> {
        if !self.status.accepts_payment() {
            return Err(match self.status {
                InvoiceStatus::Draft => BillingError::DraftNotPayable,
                _ => BillingError::AlreadyPaid,
            });
        }
        self.status = if new_total_paid >= self.total {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        Ok(())
    }
}

/// Formats a facility-scoped invoice number
///
/// `INV-{facility}-{yyyyMMdd}-{seq:04}`; the date is the facility-local
/// calendar date at finalize time.
pub fn format_invoice_number(facility_id: FacilityId, date: NaiveDate, sequence: u32) -> String {
    format!(
        "INV-{}-{}-{:04}",
        facility_id,
        date.format("%Y%m%d"),
        sequence
    )
}
