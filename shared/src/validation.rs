//! Validation utilities for the Supply Chain Management API

use rust_decimal::Decimal;

use crate::models::{CreateOrderLineInput, CreatePurchaseOrderInput};

/// Maximum length of a SKU
pub const MAX_SKU_LEN: usize = 64;

/// Highest supplier rating
pub const MAX_RATING: i64 = 5;

/// Largest amount a `NUMERIC(14, 2)` column holds
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate SKU format (1-64 characters, no whitespace)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU must not be empty");
    }
    if sku.len() > MAX_SKU_LEN {
        return Err("SKU must be at most 64 characters");
    }
    if sku.chars().any(char::is_whitespace) {
        return Err("SKU must not contain whitespace");
    }
    Ok(())
}

/// Validate that a display name is not blank
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name must not be empty");
    }
    Ok(())
}

/// Validate a monetary amount is not negative and fits the stored precision
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    if price > MAX_AMOUNT {
        return Err("Price exceeds 999999999999.99");
    }
    Ok(())
}

/// Validate supplier rating is within 0-5
pub fn validate_rating(rating: Decimal) -> Result<(), &'static str> {
    if rating < Decimal::ZERO || rating > Decimal::from(MAX_RATING) {
        return Err("Rating must be between 0 and 5");
    }
    Ok(())
}

// ============================================================================
// Purchasing Validations
// ============================================================================

/// Validate a single order line
pub fn validate_order_line(line: &CreateOrderLineInput) -> Result<(), &'static str> {
    if line.quantity <= 0 {
        return Err("Line quantity must be positive");
    }
    validate_price(line.unit_price)?;
    if line.subtotal < Decimal::ZERO {
        return Err("Line subtotal cannot be negative");
    }
    if line.subtotal > MAX_AMOUNT {
        return Err("Line subtotal exceeds 999999999999.99");
    }
    Ok(())
}

/// Validate a purchase order before it is written.
///
/// Returns the index of the offending line together with the reason.
pub fn validate_purchase_order(
    input: &CreatePurchaseOrderInput,
) -> Result<(), (Option<usize>, &'static str)> {
    if let Some(total) = input.total_cost {
        validate_price(total).map_err(|e| (None, e))?;
    }
    if let Some(arrival) = input.estimated_arrival {
        if arrival < input.order_date {
            return Err((None, "Estimated arrival cannot precede the order date"));
        }
    }
    for (idx, line) in input.lines.iter().enumerate() {
        validate_order_line(line).map_err(|e| (Some(idx), e))?;
    }
    Ok(())
}

/// Sum of caller-supplied line subtotals, `None` on overflow.
///
/// Subtotals are not recomputed from quantity and unit price.
pub fn lines_subtotal(lines: &[CreateOrderLineInput]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.subtotal))
}

/// Whether a line's subtotal disagrees with `quantity * unit_price`.
/// A product that overflows counts as a mismatch.
pub fn subtotal_mismatch(line: &CreateOrderLineInput) -> bool {
    line.unit_price
        .checked_mul(Decimal::from(line.quantity))
        .map_or(true, |expected| expected != line.subtotal)
}

/// Whether a supplied total cost disagrees with the sum of the line subtotals.
/// Orders without lines or without a total are never flagged.
pub fn total_cost_mismatch(input: &CreatePurchaseOrderInput) -> bool {
    match input.total_cost {
        Some(total) if !input.lines.is_empty() => {
            lines_subtotal(&input.lines).map_or(true, |sum| sum != total)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn line(quantity: i32, unit_price: i64, subtotal: i64) -> CreateOrderLineInput {
        CreateOrderLineInput {
            product_id: 1,
            quantity,
            unit_price: Decimal::from(unit_price),
            subtotal: Decimal::from(subtotal),
        }
    }

    fn order(lines: Vec<CreateOrderLineInput>) -> CreatePurchaseOrderInput {
        CreatePurchaseOrderInput {
            supplier_id: 1,
            order_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            estimated_arrival: None,
            total_cost: None,
            lines,
        }
    }

    // ========================================================================
    // Catalog Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_sku_valid() {
        assert!(validate_sku("BRK-001").is_ok());
    }

    #[test]
    fn test_validate_sku_empty() {
        assert!(validate_sku("").is_err());
    }

    #[test]
    fn test_validate_sku_whitespace() {
        assert!(validate_sku("BRK 001").is_err());
    }

    #[test]
    fn test_validate_sku_too_long() {
        let sku = "X".repeat(MAX_SKU_LEN + 1);
        assert!(validate_sku(&sku).is_err());
    }

    #[test]
    fn test_validate_name_blank() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Gudang Utama").is_ok());
    }

    #[test]
    fn test_validate_rating_bounds() {
        assert!(validate_rating(Decimal::ZERO).is_ok());
        assert!(validate_rating(Decimal::from(5)).is_ok());
        assert!(validate_rating(Decimal::new(51, 1)).is_err());
        assert!(validate_rating(Decimal::from(-1)).is_err());
    }

    // ========================================================================
    // Purchasing Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_order_line_zero_quantity() {
        assert!(validate_order_line(&line(0, 10, 0)).is_err());
    }

    #[test]
    fn test_validate_order_line_negative_price() {
        assert!(validate_order_line(&line(1, -10, 0)).is_err());
    }

    #[test]
    fn test_validate_purchase_order_reports_line_index() {
        let input = order(vec![line(2, 5, 10), line(-1, 5, 0)]);
        assert_eq!(
            validate_purchase_order(&input),
            Err((Some(1), "Line quantity must be positive"))
        );
    }

    #[test]
    fn test_validate_purchase_order_without_lines() {
        assert!(validate_purchase_order(&order(vec![])).is_ok());
    }

    #[test]
    fn test_validate_purchase_order_arrival_before_order() {
        let mut input = order(vec![]);
        input.estimated_arrival = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(validate_purchase_order(&input).is_err());
    }

    #[test]
    fn test_subtotal_mismatch_detected() {
        assert!(!subtotal_mismatch(&line(3, 5, 15)));
        assert!(subtotal_mismatch(&line(3, 5, 14)));
    }

    #[test]
    fn test_lines_subtotal_sums_caller_values() {
        let lines = vec![line(3, 5, 14), line(1, 2, 2)];
        assert_eq!(lines_subtotal(&lines), Some(Decimal::from(16)));
    }

    #[test]
    fn test_subtotal_mismatch_on_overflow_does_not_panic() {
        let huge = CreateOrderLineInput {
            product_id: 1,
            quantity: 1000,
            unit_price: Decimal::MAX,
            subtotal: Decimal::ZERO,
        };
        assert!(subtotal_mismatch(&huge));
    }

    #[test]
    fn test_amount_above_column_precision_rejected() {
        assert_eq!(MAX_AMOUNT.to_string(), "999999999999.99");
        assert!(validate_price(MAX_AMOUNT).is_ok());
        assert!(validate_price(MAX_AMOUNT + Decimal::new(1, 2)).is_err());

        let mut huge = line(1000, 1, 1000);
        huge.unit_price = Decimal::MAX;
        assert!(validate_order_line(&huge).is_err());

        let mut input = order(vec![]);
        input.total_cost = Some(Decimal::MAX);
        assert!(validate_purchase_order(&input).is_err());
    }

    #[test]
    fn test_total_cost_mismatch() {
        let mut input = order(vec![line(3, 5, 15), line(1, 2, 2)]);
        assert!(!total_cost_mismatch(&input));

        input.total_cost = Some(Decimal::from(17));
        assert!(!total_cost_mismatch(&input));

        input.total_cost = Some(Decimal::from(20));
        assert!(total_cost_mismatch(&input));

        input.lines.clear();
        assert!(!total_cost_mismatch(&input));
    }

    proptest! {
        #[test]
        fn prop_positive_quantity_lines_are_valid(
            quantity in 1i32..10_000,
            price in 0i64..1_000_000,
        ) {
            let subtotal = price * i64::from(quantity);
            prop_assert!(validate_order_line(&line(quantity, price, subtotal)).is_ok());
            prop_assert!(!subtotal_mismatch(&line(quantity, price, subtotal)));
        }

        #[test]
        fn prop_non_positive_quantity_rejected(quantity in -10_000i32..=0) {
            prop_assert!(validate_order_line(&line(quantity, 1, 0)).is_err());
        }
    }
}
