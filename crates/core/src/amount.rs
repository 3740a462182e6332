use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a raw amount string from a bank export into a decimal value.
///
/// Thousands separators, currency markers and inner whitespace are stripped;
/// accounting-style parentheses negate. Returns `None` for anything that
/// still fails to parse; an unreadable amount is a per-record data problem,
/// not a pipeline error.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let (negative, s) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };
    let cleaned = s.replace([',', '₩', '$', ' '], "");
    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}
