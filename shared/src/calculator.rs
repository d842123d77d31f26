//! Receipt total derivation.
//!
//! Every function here is pure and infallible: malformed numeric input
//! degrades to zero instead of surfacing an error. That is the permissive
//! policy for user-entered retail data; this is not a validated ledger.

use crate::{LineItem, RawPrice};

/// Symbol used when the configured currency field is empty
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";

/// Coerce a raw price into a finite number.
///
/// Text input is stripped down to digits and the decimal point before
/// parsing, so `"₦1,500"` and `" 1500 "` both read as `1500.0`. Anything
/// that still fails to parse (empty, `"abc"`, `"1.2.3"`) is 0. Numeric
/// input goes through the same strip-and-parse, which also folds a stray
/// negative sign away. Never returns NaN or an infinity.
pub fn sanitize_price(raw: &RawPrice) -> f64 {
    let text = match raw {
        RawPrice::Number(n) if n.is_finite() => format!("{}", n),
        RawPrice::Number(_) => return 0.0,
        RawPrice::Text(t) => t.clone(),
    };

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Amount contributed by one line: sanitized unit price times quantity.
/// Missing or negative quantity counts as 0.
pub fn line_amount(item: &LineItem) -> f64 {
    sanitize_price(&item.unit_price) * item.quantity.max(0) as f64
}

/// Sum of all line amounts. Empty list is 0; summation order does not
/// affect the result and no item is skipped or double-counted.
pub fn compute_subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(line_amount).sum()
}

fn coerce_adjustment(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.max(0.0),
        _ => 0.0,
    }
}

/// `subtotal + shipping - discount`, with both adjustments zero-floored.
///
/// The result may be negative when the discount exceeds subtotal plus
/// shipping; that is displayed as-is rather than clamped. See the
/// `grand_total_may_go_negative_when_discount_exceeds_total` test pinning
/// this behavior.
pub fn compute_grand_total(
    subtotal: f64,
    shipping_fee: Option<f64>,
    discount_amount: Option<f64>,
) -> f64 {
    subtotal + coerce_adjustment(shipping_fee) - coerce_adjustment(discount_amount)
}

/// Leading token of the configured currency field, so `"₦ (NGN)"` displays
/// as `"₦"`. An empty or blank field falls back to the default symbol;
/// the result is never empty.
pub fn derive_currency_symbol(currency_field: &str) -> String {
    currency_field
        .split_whitespace()
        .next()
        .filter(|token| !token.is_empty())
        .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
        .to_string()
}

/// Fixed two-decimal money string with thousands grouping: `1234567.5`
/// becomes `"1,234,567.50"`. Negative values keep their sign.
pub fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{}.{}", grouped, frac_part)
    } else {
        format!("{}.{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i64, price: RawPrice) -> LineItem {
        LineItem {
            id: LineItem::generate_id(1702516122000, quantity as u32),
            name: name.to_string(),
            quantity,
            unit_price: price,
        }
    }

    #[test]
    fn sanitize_strips_currency_symbols_and_separators() {
        assert_eq!(sanitize_price(&"₦1,500".into()), 1500.0);
        assert_eq!(sanitize_price(&" 1,500 ".into()), 1500.0);
        assert_eq!(sanitize_price(&"$2,000.50".into()), 2000.5);
        assert_eq!(sanitize_price(&RawPrice::Number(300.0)), 300.0);
    }

    #[test]
    fn sanitize_malformed_input_is_zero() {
        assert_eq!(sanitize_price(&"abc".into()), 0.0);
        assert_eq!(sanitize_price(&"".into()), 0.0);
        assert_eq!(sanitize_price(&"...".into()), 0.0);
        assert_eq!(sanitize_price(&"1.2.3".into()), 0.0);
        assert_eq!(sanitize_price(&RawPrice::Number(f64::NAN)), 0.0);
        assert_eq!(sanitize_price(&RawPrice::Number(f64::INFINITY)), 0.0);
    }

    #[test]
    fn sanitize_is_idempotent_on_clean_input() {
        for raw in ["1500", "2000.5", "0", "999999.99"] {
            let once = sanitize_price(&raw.into());
            let twice = sanitize_price(&RawPrice::Number(once));
            assert_eq!(once, twice, "sanitize({raw}) should be a fixed point");
        }
    }

    #[test]
    fn subtotal_matches_worked_example() {
        // items [{qty:2, price:"1,500"}, {qty:1, price:300}] -> 3300
        let items = vec![
            item("A", 2, "1,500".into()),
            item("B", 1, RawPrice::Number(300.0)),
        ];
        assert_eq!(compute_subtotal(&items), 3300.0);
    }

    #[test]
    fn subtotal_of_empty_list_is_zero() {
        assert_eq!(compute_subtotal(&[]), 0.0);
    }

    #[test]
    fn subtotal_never_negative_for_non_negative_inputs() {
        // Text prices cannot sanitize to a negative value and negative
        // quantities count as zero, so line sums stay non-negative
        let lists = [
            vec![item("A", 5, "2,000".into()), item("B", 0, "abc".into())],
            vec![item("C", 1, "0".into())],
            vec![],
        ];
        for items in &lists {
            assert!(compute_subtotal(items) >= 0.0);
        }
    }

    #[test]
    fn subtotal_is_order_independent() {
        let forward = vec![
            item("A", 2, "1,500".into()),
            item("B", 1, "300".into()),
            item("C", 3, "25.50".into()),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(compute_subtotal(&forward), compute_subtotal(&reversed));
    }

    #[test]
    fn unparseable_price_contributes_zero_regardless_of_quantity() {
        let items = vec![item("Mystery", 99, "abc".into()), item("B", 1, "300".into())];
        assert_eq!(compute_subtotal(&items), 300.0);
    }

    #[test]
    fn missing_or_negative_quantity_counts_as_zero() {
        let items = vec![item("A", 0, "1,500".into()), item("B", -3, "300".into())];
        assert_eq!(compute_subtotal(&items), 0.0);
    }

    #[test]
    fn grand_total_matches_worked_example() {
        // 3300 + 200 shipping - 500 discount -> 3000
        assert_eq!(compute_grand_total(3300.0, Some(200.0), Some(500.0)), 3000.0);
    }

    #[test]
    fn grand_total_defaults_missing_adjustments_to_zero() {
        assert_eq!(compute_grand_total(3300.0, None, None), 3300.0);
        assert_eq!(compute_grand_total(3300.0, Some(-50.0), Some(f64::NAN)), 3300.0);
    }

    #[test]
    fn grand_total_may_go_negative_when_discount_exceeds_total() {
        // Deliberately unclamped; a future business rule may revisit this,
        // and this assertion makes that decision explicit.
        assert_eq!(compute_grand_total(100.0, Some(20.0), Some(500.0)), -380.0);
    }

    #[test]
    fn currency_symbol_takes_leading_token() {
        assert_eq!(derive_currency_symbol("₦ (NGN)"), "₦");
        assert_eq!(derive_currency_symbol("$"), "$");
        assert_eq!(derive_currency_symbol("  £ GBP "), "£");
    }

    #[test]
    fn currency_symbol_never_empty() {
        assert_eq!(derive_currency_symbol(""), DEFAULT_CURRENCY_SYMBOL);
        assert_eq!(derive_currency_symbol("   "), DEFAULT_CURRENCY_SYMBOL);
        assert!(!derive_currency_symbol("").is_empty());
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(300.0), "300.00");
        assert_eq!(format_amount(3300.0), "3,300.00");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(-380.0), "-380.00");
    }
}
