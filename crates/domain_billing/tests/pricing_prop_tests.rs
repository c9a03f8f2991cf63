//! Property-based tests for invoice pricing

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Currency;
use domain_billing::price_items;
use test_utils::generators::{money_amount, valid_item_requests};

proptest! {
    /// For every valid item set the totals equal the doubly rounded
    /// expression: each line rounds on computation, the subtotal is the
    /// exact sum of rounded lines, and the total rounds once more after
    /// the invoice-level discount.
    #[test]
    fn totals_follow_the_rounding_contract(items in valid_item_requests()) {
        let priced = price_items(&items, Decimal::ZERO, Currency::NGN).unwrap();

        let expected: Decimal = priced.items.iter().map(|i| i.line_total.amount()).sum();
        prop_assert_eq!(priced.subtotal.amount(), expected);
        prop_assert_eq!(priced.total.amount(), expected);
        prop_assert!(!priced.total.is_negative());
        prop_assert!(priced.total.amount().scale() <= 2);
    }

    /// Reordering the line items never changes the subtotal
    #[test]
    fn subtotal_is_permutation_insensitive(mut items in valid_item_requests()) {
        let forward = price_items(&items, Decimal::ZERO, Currency::NGN).unwrap();
        items.reverse();
        let backward = price_items(&items, Decimal::ZERO, Currency::NGN).unwrap();

        prop_assert_eq!(forward.subtotal, backward.subtotal);
    }

    /// An invoice-level discount up to the subtotal keeps the total
    /// non-negative and exactly subtotal minus discount; anything beyond
    /// the subtotal is rejected before any rounding can mask it
    #[test]
    fn invoice_discount_respects_the_floor(
        items in valid_item_requests(),
        discount in money_amount(10_000_000),
    ) {
        let subtotal = price_items(&items, Decimal::ZERO, Currency::NGN)
            .unwrap()
            .subtotal;

        let result = price_items(&items, discount, Currency::NGN);
        if discount <= subtotal.amount() {
            let priced = result.unwrap();
            prop_assert_eq!(priced.total.amount(), subtotal.amount() - discount);
        } else {
            prop_assert!(result.is_err());
        }
    }
}
