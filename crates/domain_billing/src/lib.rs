//! Billing Domain - invoice lifecycle and payment application
//!
//! This crate is the core of the clinic billing engine:
//!
//! - **Pricing** turns item requests into priced, persistable invoices
//!   with deterministic two-decimal rounding.
//! - **The invoice state machine** governs `Draft -> Finalized ->
//!   {PartiallyPaid, Paid}` and blocks edits once a transition happened.
//! - **The payment processor** validates payment requests against invoice
//!   state and remaining balance, detects duplicate submissions, and
//!   applies the payment together with the patient's wallet and intake
//!   status as one atomic unit.
//!
//! Money can never be double-counted, over-applied, or attributed to the
//! wrong invoice: the sum of an invoice's payments never exceeds its
//! total, and `Paid` holds exactly when the sum equals the total.

pub mod config;
pub mod error;
pub mod invoice;
pub mod payment;
pub mod ports;
pub mod pricing;
pub mod services;

pub use config::BillingConfig;
pub use error::BillingError;
pub use invoice::{format_invoice_number, Invoice, InvoiceItem, InvoiceStatus};
pub use payment::{Payment, PaymentMethod, UnknownPaymentMethod};
pub use ports::BillingPort;
pub use pricing::{
    price_items, CreateInvoiceRequest, InvoiceItemRequest, PricedInvoice, UpdateInvoiceRequest,
};
pub use services::{BillingService, ProcessPaymentRequest};
