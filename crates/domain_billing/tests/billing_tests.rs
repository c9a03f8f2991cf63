//! Comprehensive tests for domain_billing entities and pricing

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, FacilityId, Money, PatientId, UserId};
use domain_billing::{
    format_invoice_number, price_items, BillingError, Invoice, InvoiceItemRequest, InvoiceStatus,
    Payment, PaymentMethod,
};

fn facility() -> FacilityId {
    FacilityId::new(1)
}

fn items(specs: &[(&str, i64, i64, i64)]) -> Vec<InvoiceItemRequest> {
    specs
        .iter()
        .map(|(name, qty, price, discount)| InvoiceItemRequest {
            service_name: name.to_string(),
            quantity: rust_decimal::Decimal::new(*qty, 0),
            unit_price: rust_decimal::Decimal::new(*price, 0),
            discount_amount: rust_decimal::Decimal::new(*discount, 0),
        })
        .collect()
}

fn draft_invoice(item_specs: &[(&str, i64, i64, i64)], discount: i64) -> Invoice {
    let priced = price_items(
        &items(item_specs),
        rust_decimal::Decimal::new(discount, 0),
        Currency::NGN,
    )
    .unwrap();
    Invoice::draft(
        facility(),
        PatientId::new_v7(),
        None,
        priced,
        UserId::new(),
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    )
}

// ============================================================================
// Pricing Tests
// ============================================================================

mod pricing_tests {
    use super::*;

    #[test]
    fn multi_line_invoice_totals() {
        let invoice = draft_invoice(
            &[
                ("Consultation", 1, 2000, 0),
                ("Full Blood Count", 2, 1500, 200),
                ("Malaria Test", 1, 800, 0),
            ],
            300,
        );

        // Lines: 2000, 2800, 800
        assert_eq!(invoice.subtotal.amount(), dec!(5600));
        assert_eq!(invoice.discount_amount.amount(), dec!(300));
        assert_eq!(invoice.total.amount(), dec!(5300));
        assert_eq!(invoice.items.len(), 3);
    }

    #[test]
    fn total_invariant_holds() {
        let invoice = draft_invoice(&[("Consultation", 2, 5000, 0)], 500);
        let recomputed = invoice.subtotal - invoice.discount_amount;
        assert_eq!(invoice.total, recomputed);
        assert!(!invoice.total.is_negative());
    }

    #[test]
    fn item_level_and_invoice_level_discounts_stack() {
        let invoice = draft_invoice(&[("Consultation", 1, 1000, 100)], 100);
        assert_eq!(invoice.items[0].line_total.amount(), dec!(900));
        assert_eq!(invoice.total.amount(), dec!(800));
    }

    #[test]
    fn fractional_quantities_round_per_line() {
        let priced = price_items(
            &[InvoiceItemRequest {
                service_name: "Infusion (hours)".to_string(),
                quantity: dec!(1.5),
                unit_price: dec!(333.33),
                discount_amount: dec!(0),
            }],
            dec!(0),
            Currency::NGN,
        )
        .unwrap();

        // 1.5 * 333.33 = 499.995, rounds half away from zero to 500.00
        assert_eq!(priced.items[0].line_total.amount(), dec!(500.00));
        assert_eq!(priced.subtotal.amount(), dec!(500.00));
    }
}

// ============================================================================
// Invoice State Machine Tests
// ============================================================================

mod state_machine_tests {
    use super::*;

    #[test]
    fn lifecycle_draft_finalized_partially_paid_paid() {
        let mut invoice = draft_invoice(&[("Consultation", 2, 5000, 0)], 500);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        assert!(invoice.status.is_draft());
        invoice
            .finalize(format_invoice_number(facility(), at.date_naive(), 1), at)
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Finalized);
        assert!(invoice.status.accepts_payment());

        invoice
            .record_payment_total(Money::new(dec!(4000), Currency::NGN))
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::PartiallyPaid);
        assert!(invoice.status.accepts_payment());

        invoice
            .record_payment_total(Money::new(dec!(9500), Currency::NGN))
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert!(!invoice.status.accepts_payment());
    }

    #[test]
    fn finalize_requires_draft() {
        let mut invoice = draft_invoice(&[("Consultation", 1, 100, 0)], 0);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        invoice
            .finalize("INV-1-20240501-0001".to_string(), at)
            .unwrap();

        let result = invoice.finalize("INV-1-20240501-0002".to_string(), at);
        assert!(matches!(
            result,
            Err(BillingError::NotDraft {
                action: "finalized",
                status: InvoiceStatus::Finalized,
            })
        ));
    }

    #[test]
    fn paid_is_terminal() {
        let mut invoice = draft_invoice(&[("Consultation", 1, 100, 0)], 0);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        invoice
            .finalize("INV-1-20240501-0001".to_string(), at)
            .unwrap();
        invoice
            .record_payment_total(Money::new(dec!(100), Currency::NGN))
            .unwrap();

        assert!(matches!(
            invoice.record_payment_total(Money::new(dec!(100), Currency::NGN)),
            Err(BillingError::AlreadyPaid)
        ));
        assert!(matches!(
            invoice.replace_items(
                price_items(&items(&[("X", 1, 1, 0)]), dec!(0), Currency::NGN).unwrap()
            ),
            Err(BillingError::NotDraft { .. })
        ));
    }

    #[test]
    fn overshooting_total_still_lands_on_paid() {
        // The processor rejects overpayment upstream; the state machine
        // itself treats any sum >= total as settled
        let mut invoice = draft_invoice(&[("Consultation", 1, 100, 0)], 0);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        invoice
            .finalize("INV-1-20240501-0001".to_string(), at)
            .unwrap();
        invoice
            .record_payment_total(Money::new(dec!(150), Currency::NGN))
            .unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);
    }
}

// ============================================================================
// Invoice Number Tests
// ============================================================================

mod invoice_number_tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn number_embeds_facility_date_and_sequence() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
        assert_eq!(
            format_invoice_number(FacilityId::new(7), date, 42),
            "INV-7-20241203-0042"
        );
    }

    #[test]
    fn sequence_pads_to_four_digits_and_widens() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            format_invoice_number(facility(), date, 1),
            "INV-1-20240101-0001"
        );
        assert_eq!(
            format_invoice_number(facility(), date, 12345),
            "INV-1-20240101-12345"
        );
    }
}

// ============================================================================
// Payment Tests
// ============================================================================

mod payment_tests {
    use super::*;
    use core_kernel::InvoiceId;

    #[test]
    fn payment_captures_actor_and_instant() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();
        let user = UserId::new();
        let payment = Payment::new(
            facility(),
            InvoiceId::new_v7(),
            Money::new(dec!(4000), Currency::NGN),
            PaymentMethod::Cash,
            None,
            user,
            created_at,
        );

        assert_eq!(payment.created_by, user);
        assert_eq!(payment.created_at, created_at);
        assert!(payment.idempotency_key.is_none());
    }

    #[test]
    fn payment_amount_is_two_decimal() {
        let payment = Payment::new(
            facility(),
            InvoiceId::new_v7(),
            Money::new(dec!(99.999), Currency::NGN),
            PaymentMethod::Card,
            Some("key-1".to_string()),
            UserId::new(),
            Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap(),
        );
        assert_eq!(payment.amount.amount(), dec!(100.00));
    }

    #[test]
    fn method_serializes_as_closed_variant() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"BankTransfer\"");
    }
}

// ============================================================================
// Serde Round-trip
// ============================================================================

mod serde_tests {
    use super::*;

    #[test]
    fn invoice_roundtrips_through_json() {
        let invoice = draft_invoice(&[("Consultation", 2, 5000, 0)], 500);
        let json = serde_json::to_string(&invoice).unwrap();
        let back: Invoice = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, invoice.id);
        assert_eq!(back.total, invoice.total);
        assert_eq!(back.status, InvoiceStatus::Draft);
        assert_eq!(back.items.len(), invoice.items.len());
    }
}
