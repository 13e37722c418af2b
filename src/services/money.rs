//! Money calculation for quote submissions
//!
//! All arithmetic is done with `Decimal` and rounded half-up to two places;
//! results are converted to `f64` for storage and serialization.

use rust_decimal::prelude::*;

use crate::db::models::{Availability, LineItemInput};
use crate::services::BroadcastError;

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9_999;

/// Computed totals of one quote
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteTotals {
    pub subtotal: f64,
    pub total: f64,
    /// Count of non-unavailable items
    pub items_count: i32,
    /// Per-line totals, same order as the input
    pub line_totals: Vec<f64>,
}

#[inline]
fn require_finite(value: f64, field: &str) -> Result<(), BroadcastError> {
    if !value.is_finite() {
        return Err(BroadcastError::InvalidLineItems(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate a quote before any state is touched
pub fn validate_line_items(
    items: &[LineItemInput],
    delivery_fee: f64,
) -> Result<(), BroadcastError> {
    if items.is_empty() {
        return Err(BroadcastError::InvalidLineItems(
            "at least one line item is required".into(),
        ));
    }

    require_finite(delivery_fee, "delivery_fee")?;
    if delivery_fee < 0.0 {
        return Err(BroadcastError::InvalidLineItems(format!(
            "delivery_fee must be non-negative, got {delivery_fee}"
        )));
    }

    for (idx, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(BroadcastError::InvalidLineItems(format!(
                "item {idx} has an empty name"
            )));
        }
        require_finite(item.unit_price, "unit_price")?;
        if item.unit_price < 0.0 || item.unit_price > MAX_UNIT_PRICE {
            return Err(BroadcastError::InvalidLineItems(format!(
                "item {idx} unit_price out of range: {}",
                item.unit_price
            )));
        }
        if item.quantity < 1 || item.quantity > MAX_QUANTITY {
            return Err(BroadcastError::InvalidLineItems(format!(
                "item {idx} quantity out of range: {}",
                item.quantity
            )));
        }
        match item.availability {
            Availability::Substituted => {
                let substitute = item.substitute_total.ok_or_else(|| {
                    BroadcastError::InvalidLineItems(format!(
                        "item {idx} is substituted but carries no substitute total"
                    ))
                })?;
                require_finite(substitute, "substitute_total")?;
                if substitute < 0.0 {
                    return Err(BroadcastError::InvalidLineItems(format!(
                        "item {idx} substitute_total must be non-negative, got {substitute}"
                    )));
                }
            }
            Availability::Available | Availability::Unavailable => {}
        }
    }

    Ok(())
}

/// Round to two decimal places, half-up
fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Compute per-line and quote totals.
///
/// Unavailable items contribute nothing; substituted items contribute their
/// substitute total instead of the nominal line total. Assumes the items
/// passed [`validate_line_items`].
pub fn quote_totals(items: &[LineItemInput], delivery_fee: f64) -> QuoteTotals {
    let mut subtotal = Decimal::ZERO;
    let mut items_count = 0;
    let mut line_totals = Vec::with_capacity(items.len());

    for item in items {
        let unit_price = Decimal::from_f64(item.unit_price).unwrap_or_default();
        let quantity = Decimal::from(item.quantity);
        let line_total = round_money(unit_price * quantity);
        line_totals.push(to_f64(line_total));

        match item.availability {
            Availability::Unavailable => {}
            Availability::Substituted => {
                let substitute = Decimal::from_f64(item.substitute_total.unwrap_or(0.0))
                    .unwrap_or_default();
                subtotal += round_money(substitute);
                items_count += 1;
            }
            Availability::Available => {
                subtotal += line_total;
                items_count += 1;
            }
        }
    }

    let fee = round_money(Decimal::from_f64(delivery_fee).unwrap_or_default());
    let subtotal = round_money(subtotal);
    let total = round_money(subtotal + fee);

    QuoteTotals {
        subtotal: to_f64(subtotal),
        total: to_f64(total),
        items_count,
        line_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, qty: i32, availability: Availability) -> LineItemInput {
        LineItemInput {
            name: "rice".into(),
            unit_kind: Some("bag".into()),
            unit_price: price,
            quantity: qty,
            availability,
            substitute_total: None,
        }
    }

    #[test]
    fn totals_sum_available_lines() {
        let items = vec![
            item(15.0, 2, Availability::Available),
            item(10.0, 1, Availability::Available),
        ];
        let totals = quote_totals(&items, 10.0);
        assert_eq!(totals.subtotal, 40.0);
        assert_eq!(totals.total, 50.0);
        assert_eq!(totals.items_count, 2);
        assert_eq!(totals.line_totals, vec![30.0, 10.0]);
    }

    #[test]
    fn unavailable_lines_are_excluded() {
        let items = vec![
            item(15.0, 2, Availability::Available),
            item(99.0, 3, Availability::Unavailable),
        ];
        let totals = quote_totals(&items, 0.0);
        assert_eq!(totals.subtotal, 30.0);
        assert_eq!(totals.items_count, 1);
    }

    #[test]
    fn substituted_lines_use_substitute_total() {
        let mut substituted = item(20.0, 1, Availability::Substituted);
        substituted.substitute_total = Some(12.5);
        let items = vec![item(10.0, 1, Availability::Available), substituted];
        let totals = quote_totals(&items, 2.5);
        assert_eq!(totals.subtotal, 22.5);
        assert_eq!(totals.total, 25.0);
        assert_eq!(totals.items_count, 2);
    }

    #[test]
    fn rounding_is_half_up() {
        let items = vec![item(0.335, 1, Availability::Available)];
        let totals = quote_totals(&items, 0.0);
        assert_eq!(totals.subtotal, 0.34);
    }

    #[test]
    fn rejects_empty_quote() {
        assert!(matches!(
            validate_line_items(&[], 0.0),
            Err(BroadcastError::InvalidLineItems(_))
        ));
    }

    #[test]
    fn rejects_negative_delivery_fee() {
        let items = vec![item(1.0, 1, Availability::Available)];
        assert!(validate_line_items(&items, -0.5).is_err());
    }

    #[test]
    fn rejects_substitution_without_total() {
        let items = vec![item(1.0, 1, Availability::Substituted)];
        assert!(validate_line_items(&items, 0.0).is_err());
    }

    #[test]
    fn rejects_non_finite_price() {
        let items = vec![item(f64::NAN, 1, Availability::Available)];
        assert!(validate_line_items(&items, 0.0).is_err());
    }

    #[test]
    fn rejects_zero_quantity() {
        let items = vec![item(1.0, 0, Availability::Available)];
        assert!(validate_line_items(&items, 0.0).is_err());
    }
}
