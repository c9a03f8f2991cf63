//! Property-based test data generators

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_billing::InvoiceItemRequest;

/// A non-negative two-decimal amount below the given bound in minor units
pub fn money_amount(max_minor: i64) -> impl Strategy<Value = Decimal> {
    (0..max_minor).prop_map(|minor| Decimal::new(minor, 2))
}

/// A valid line item: positive quantity, non-negative price, and a
/// discount that never pushes the line total negative
pub fn valid_item_request() -> impl Strategy<Value = InvoiceItemRequest> {
    (1i64..50i64, money_amount(10_000_000), 0u32..=100u32).prop_map(
        |(quantity, unit_price, discount_pct)| {
            let quantity = Decimal::new(quantity, 0);
            let line = quantity * unit_price;
            let discount = (line * Decimal::new(discount_pct as i64, 0) / Decimal::new(100, 0))
                .round_dp(2);
            InvoiceItemRequest {
                service_name: "Service".to_string(),
                quantity,
                unit_price,
                discount_amount: discount,
            }
        },
    )
}

/// A non-empty batch of valid line items
pub fn valid_item_requests() -> impl Strategy<Value = Vec<InvoiceItemRequest>> {
    proptest::collection::vec(valid_item_request(), 1..10)
}
