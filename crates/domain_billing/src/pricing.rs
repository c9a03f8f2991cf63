//! Invoice pricing
//!
//! Pricing turns a list of item requests plus an invoice-level discount
//! into priced, persistable line items and totals. Creation and Draft
//! update share this single path, so an edited invoice can never total
//! differently from a freshly created one with the same inputs.
//!
//! Rounding: every monetary figure rounds to two decimals half away from
//! zero immediately after each line computation and again after
//! aggregation (the `Money` constructor enforces this; nothing defers
//! rounding to the end).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{AppointmentId, Currency, Money, PatientId};

use crate::error::BillingError;
use crate::invoice::InvoiceItem;

/// One requested line item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceItemRequest {
    /// Billed service
    #[validate(length(min = 1, message = "Service name is required"))]
    pub service_name: String,
    /// Quantity, must be greater than zero
    pub quantity: Decimal,
    /// Price per unit, non-negative
    pub unit_price: Decimal,
    /// Line-level discount, non-negative
    #[serde(default)]
    pub discount_amount: Decimal,
}

/// Request for creating a Draft invoice
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    /// Patient being billed
    pub patient_id: PatientId,
    /// Optional visit to bill
    pub appointment_id: Option<AppointmentId>,
    /// Line items, at least one
    #[validate(
        length(min = 1, message = "At least one invoice item is required"),
        nested
    )]
    pub items: Vec<InvoiceItemRequest>,
    /// Invoice-level discount, non-negative
    #[serde(default)]
    pub discount_amount: Decimal,
}

/// Request for replacing a Draft invoice's items
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    /// Replacement line items, at least one
    #[validate(
        length(min = 1, message = "At least one invoice item is required"),
        nested
    )]
    pub items: Vec<InvoiceItemRequest>,
    /// Invoice-level discount, non-negative
    #[serde(default)]
    pub discount_amount: Decimal,
}

/// The output of pricing: persistable items plus totals
#[derive(Debug, Clone)]
pub struct PricedInvoice {
    pub items: Vec<InvoiceItem>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
}

/// Prices item requests into line items and totals
///
/// Fails with a `Validation` error naming the offending field when any
/// item has a non-positive quantity, a negative unit price or discount, a
/// negative computed line total, or when the invoice-level discount is
/// negative or pushes the total below zero.
pub fn price_items(
    items: &[InvoiceItemRequest],
    invoice_discount: Decimal,
    currency: Currency,
) -> Result<PricedInvoice, BillingError> {
    if items.is_empty() {
        return Err(BillingError::validation_field(
            "At least one invoice item is required",
            "items",
        ));
    }

    if invoice_discount.is_sign_negative() {
        return Err(BillingError::validation_field(
            "Invoice discount cannot be negative",
            "discount_amount",
        ));
    }

    let mut subtotal = Money::zero(currency);
    let mut priced = Vec::with_capacity(items.len());

    for item in items {
        if item.service_name.trim().is_empty() {
            return Err(BillingError::validation_field(
                "Service name is required",
                "service_name",
            ));
        }
        if item.quantity <= Decimal::ZERO {
            return Err(BillingError::validation_field(
                "Quantity must be greater than 0",
                "quantity",
            ));
        }
        if item.unit_price.is_sign_negative() {
            return Err(BillingError::validation_field(
                "Unit price cannot be negative",
                "unit_price",
            ));
        }
        if item.discount_amount.is_sign_negative() {
            return Err(BillingError::validation_field(
                "Discount amount cannot be negative",
                "discount_amount",
            ));
        }

        let raw_line = item.quantity * item.unit_price - item.discount_amount;
        if raw_line.is_sign_negative() {
            return Err(BillingError::validation_field(
                "Line total cannot be negative",
                "discount_amount",
            ));
        }

        let line_total = Money::new(raw_line, currency);
        subtotal = subtotal.checked_add(&line_total)?;

        priced.push(InvoiceItem {
            id: Uuid::new_v4(),
            service_name: item.service_name.trim().to_string(),
            quantity: item.quantity,
            unit_price: Money::new(item.unit_price, currency),
            discount_amount: Money::new(item.discount_amount, currency),
            line_total,
        });
    }

    let discount = Money::new(invoice_discount, currency);
    let total = subtotal.checked_sub(&discount)?;
    if total.is_negative() {
        return Err(BillingError::validation_field(
            "Invoice total cannot be negative",
            "discount_amount",
        ));
    }

    Ok(PricedInvoice {
        items: priced,
        subtotal,
        discount_amount: discount,
        total,
    })
}
