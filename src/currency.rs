//! Formats amounts of money for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format `number` as a dollar amount with exactly two decimal places and
/// comma separated thousands, e.g. `$1,234.50`, `-$30.00` or `$0.00`.
///
/// `number` is rounded to the nearest cent (half away from zero) first.
pub fn format_currency(number: Decimal) -> String {
    let mut number = number.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    if number.is_zero() {
        return "$0.00".to_owned();
    }

    number.rescale(2);
    let sign = if number.is_sign_negative() { "-" } else { "" };
    let digits = number.abs().to_string();
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);

    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped
}
