//! Billing domain errors
//!
//! Variants carry the detail a caller needs to render a corrective
//! message: the offending field, the remaining balance, the current
//! status, the conflicting row. `kind()` classifies each into the shared
//! taxonomy; only store failures land in the unrecoverable class.

use thiserror::Error;

use core_kernel::{Classify, ErrorKind, InvoiceId, Money, MoneyError, PaymentId, PortError};

use crate::invoice::InvoiceStatus;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Malformed or out-of-range input
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<&'static str>,
    },

    /// Payment larger than what is still owed on the invoice
    #[error("Payment amount exceeds remaining balance of {remaining}")]
    ExceedsRemainingBalance { remaining: Money },

    /// Wallet payment larger than the live wallet balance
    #[error("Insufficient wallet funds: balance is {balance}")]
    InsufficientWalletFunds { balance: Money },

    /// Referenced entity absent or outside the caller's facility
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A non-Draft invoice already bills this appointment
    #[error("An invoice already exists for this appointment: {invoice_id}")]
    DuplicateAppointmentInvoice { invoice_id: InvoiceId },

    /// The same payment was already recorded
    #[error("Duplicate payment request; payment {payment_id} was already recorded")]
    DuplicatePayment { payment_id: PaymentId },

    /// Operation requires Draft status
    #[error("Only draft invoices can be {action}; current status is {status}")]
    NotDraft {
        action: &'static str,
        status: InvoiceStatus,
    },

    /// Payment against an unfinalized invoice
    #[error("Cannot pay a draft invoice; finalize it first")]
    DraftNotPayable,

    /// Payment against a settled invoice
    #[error("Invoice is already fully paid")]
    AlreadyPaid,

    /// Money arithmetic failure (currency mismatch)
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Store failure
    #[error("Storage error: {0}")]
    Store(#[from] PortError),
}

impl BillingError {
    /// Creates a Validation error with a message
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: &'static str) -> Self {
        BillingError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        BillingError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl Classify for BillingError {
    fn kind(&self) -> ErrorKind {
        match self {
            BillingError::Validation { .. }
            | BillingError::ExceedsRemainingBalance { .. }
            | BillingError::InsufficientWalletFunds { .. } => ErrorKind::Validation,
            BillingError::NotFound { .. } => ErrorKind::NotFound,
            BillingError::DuplicateAppointmentInvoice { .. }
            | BillingError::DuplicatePayment { .. }
            | BillingError::NotDraft { .. }
            | BillingError::DraftNotPayable
            | BillingError::AlreadyPaid => ErrorKind::Conflict,
            BillingError::Money(_) | BillingError::Store(_) => ErrorKind::Internal,
        }
    }
}
