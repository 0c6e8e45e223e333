use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const CRORE: Decimal = dec!(10000000);
const LAKH: Decimal = dec!(100000);
const THOUSAND: Decimal = dec!(1000);

/// Whole rupees with Indian digit grouping: ₹1,04,13,879.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();
    format!("{sign}₹{}", group_indian(&digits))
}

/// f64 variant for EMI results. Non-finite values print as-is.
pub fn format_inr_f64(amount: f64) -> String {
    match Decimal::from_f64(amount) {
        Some(d) => format_inr(d),
        None => amount.to_string(),
    }
}

/// Listing-card style: ₹1.2Cr, ₹55.0L, ₹45K, ₹950.
pub fn format_compact(amount: Decimal) -> String {
    let abs = amount.abs();
    if abs >= CRORE {
        format!("₹{:.1}Cr", round_to(amount / CRORE, 1))
    } else if abs >= LAKH {
        format!("₹{:.1}L", round_to(amount / LAKH, 1))
    } else if abs >= THOUSAND {
        format!("₹{}K", round_to(amount / THOUSAND, 0))
    } else {
        format_inr(amount)
    }
}

fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_inr(dec!(0)), "₹0");
        assert_eq!(format_inr(dec!(999)), "₹999");
        assert_eq!(format_inr(dec!(1000)), "₹1,000");
        assert_eq!(format_inr(dec!(100000)), "₹1,00,000");
        assert_eq!(format_inr(dec!(10413878.8)), "₹1,04,13,879");
        assert_eq!(format_inr(dec!(-43391.16)), "-₹43,391");
    }

    #[test]
    fn test_inr_from_f64() {
        assert_eq!(format_inr_f64(43391.1616682767), "₹43,391");
        assert_eq!(format_inr_f64(f64::NAN), "NaN");
    }

    #[test]
    fn test_compact_listing_prices() {
        assert_eq!(format_compact(dec!(15000000)), "₹1.5Cr");
        assert_eq!(format_compact(dec!(12000000)), "₹1.2Cr");
        assert_eq!(format_compact(dec!(5500000)), "₹55.0L");
        assert_eq!(format_compact(dec!(2800000)), "₹28.0L");
        assert_eq!(format_compact(dec!(45000)), "₹45K");
        assert_eq!(format_compact(dec!(25000)), "₹25K");
        assert_eq!(format_compact(dec!(950)), "₹950");
    }
}
