//! Display formatting for monetary amounts.
//!
//! Presentation only: nothing here feeds back into a calculation.

use rust_decimal::{Decimal, RoundingStrategy};

/// The currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Formats an amount as whole rupees with Indian digit grouping.
///
/// The last three digits form one group and every two digits before that
/// form another. Halves round away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::formatting::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456789, 2)), "₹12,34,568");
/// assert_eq!(format_currency(Decimal::new(-1000, 0)), "-₹1,000");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().to_string();

    format!("{}{}{}", sign, CURRENCY_SYMBOL, group_indian(&digits))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (mut rest, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
