//! Money calculation utilities using rust_decimal for precision
//!
//! All amounts are `Decimal`, rounded to 2 places (half away from zero)
//! wherever a value is produced. Documents carry decimals as JSON numbers.

use super::error::OrderError;
use rust_decimal::prelude::*;
use shared::order::OrderProduct;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item (1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: u32 = 9999;
/// Maximum allowed tendered cash (1,000,000)
pub const MAX_PAYMENT_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert to f64 for error details and display
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Line total: explicit `total` if present, else `price × quantity`
///
/// Additions are not folded in; the kitchen prices them into `total` when
/// they matter.
pub fn line_total(item: &OrderProduct) -> Result<Decimal, OrderError> {
    if let Some(total) = item.total {
        return Ok(total);
    }
    item.price
        .checked_mul(Decimal::from(item.quantity))
        .ok_or_else(|| {
            OrderError::validation(format!(
                "line total overflows for '{}': {} × {}",
                item.product_name, item.price, item.quantity
            ))
        })
}

/// Order total from its line items
///
/// Pure and order-independent: any permutation of `products` gives the
/// same result.
pub fn compute_total(products: &[OrderProduct]) -> Result<Decimal, OrderError> {
    let total = products.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(line_total(item)?)
            .ok_or_else(|| OrderError::validation("order total overflows"))
    })?;
    Ok(round_money(total))
}

/// Outcome of a successful cash check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashOutcome {
    pub change: Decimal,
}

/// Check tendered cash against the amount due
pub fn validate_cash(total: Decimal, received: Decimal) -> Result<CashOutcome, OrderError> {
    let total = round_money(total);
    let received = round_money(received);

    if received < total {
        return Err(OrderError::InsufficientCash {
            total,
            received,
            deficit: total - received,
        });
    }
    Ok(CashOutcome {
        change: (received - total).max(Decimal::ZERO),
    })
}

/// Validate a tendered amount before it reaches [`validate_cash`]
pub fn validate_tendered(received: Decimal) -> Result<(), OrderError> {
    if received.is_sign_negative() {
        return Err(OrderError::validation(format!(
            "tendered amount must be non-negative, got {}",
            received
        )));
    }
    if received > MAX_PAYMENT_AMOUNT {
        return Err(OrderError::validation(format!(
            "tendered amount exceeds maximum allowed ({}), got {}",
            MAX_PAYMENT_AMOUNT, received
        )));
    }
    Ok(())
}

/// Validate a line item at intake
pub fn validate_line_item(item: &OrderProduct) -> Result<(), OrderError> {
    // Price must be non-negative and bounded
    if item.price.is_sign_negative() && !item.price.is_zero() {
        return Err(OrderError::validation(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(OrderError::validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }

    // Quantity must be positive and within bounds
    if item.quantity == 0 {
        return Err(OrderError::validation(format!(
            "quantity must be positive for '{}'",
            item.product_name
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(OrderError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }

    // Explicit line total follows the same bounds as price
    if let Some(total) = item.total
        && (total.is_sign_negative() && !total.is_zero())
    {
        return Err(OrderError::validation(format!(
            "line total must be non-negative, got {}",
            total
        )));
    }

    // Additions are price deltas and may be negative, but stay bounded
    if let Some(additions) = &item.additions {
        for addition in additions {
            if addition.price.abs() > MAX_PRICE {
                return Err(OrderError::validation(format!(
                    "addition '{}' price exceeds maximum allowed, got {}",
                    addition.name, addition.price
                )));
            }
        }
    }

    Ok(())
}
