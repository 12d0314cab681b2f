use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every stored amount is normalized to.
pub const SCALE: u32 = 4;

/// Rounds to [`SCALE`] places, ties going to the even neighbour.
pub fn normalize(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Parses a caller-supplied amount. Returns `None` for anything that is not
/// a plain or scientific decimal number.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .map(normalize)
}

/// Fixed four-place rendering used by the CSV report.
pub fn format(value: Decimal) -> String {
    let mut v = normalize(value);
    v.rescale(SCALE);
    v.to_string()
}
