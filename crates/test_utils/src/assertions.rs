//! Custom test assertions
//!
//! Assertion helpers for domain types that give more meaningful error
//! messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::{Classify, ErrorKind, Money};
use domain_billing::{Invoice, InvoiceStatus};

/// Asserts that a Money value carries exactly the given amount
pub fn assert_money_amount(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money amount mismatch: actual={}, expected={}",
        actual.amount(),
        expected
    );
}

/// Asserts that an error classifies into the expected kind
pub fn assert_kind<E: Classify + std::fmt::Debug>(error: &E, expected: ErrorKind) {
    assert_eq!(
        error.kind(),
        expected,
        "Error kind mismatch for {:?}: actual={}, expected={}",
        error,
        error.kind(),
        expected
    );
}

/// Asserts an invoice's status with its number in the failure message
pub fn assert_invoice_status(invoice: &Invoice, expected: InvoiceStatus) {
    assert_eq!(
        invoice.status,
        expected,
        "Invoice {} status mismatch: actual={}, expected={}",
        invoice.id,
        invoice.status,
        expected
    );
}
