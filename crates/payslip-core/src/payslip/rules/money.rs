//! Monetary token parsing for payslip columns.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::PLAIN_DECIMAL;

/// Parse a single whitespace-delimited token as a signed amount.
///
/// `$` and `,` are ignored, a trailing `-` (`"123.45-"`) and accounting-style
/// parentheses (`"(123.45)"`) both mark a negative value. Returns `None` when the
/// token is not a plain decimal, which is distinct from `Some(0)`.
pub fn parse_money_token(token: &str) -> Option<Decimal> {
    let cleaned: String = token.chars().filter(|c| *c != '$' && *c != ',').collect();

    if let Some(inner) = cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        if inner.starts_with(['+', '-']) {
            return None;
        }
        return parse_plain_decimal(inner).map(|v| -v);
    }

    match cleaned.strip_suffix('-') {
        Some(inner) => parse_plain_decimal(&format!("-{inner}")),
        None => parse_plain_decimal(&cleaned),
    }
}

fn parse_plain_decimal(s: &str) -> Option<Decimal> {
    if !PLAIN_DECIMAL.is_match(s) {
        return None;
    }

    let (negative, magnitude) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = magnitude.strip_suffix('.').unwrap_or(magnitude);
    let value = if magnitude.starts_with('.') {
        Decimal::from_str(&format!("0{magnitude}")).ok()?
    } else {
        Decimal::from_str(magnitude).ok()?
    };

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plain_amounts() {
        assert_eq!(parse_money_token("45.00"), Some(dec("45.00")));
        assert_eq!(parse_money_token("540"), Some(dec("540")));
        assert_eq!(parse_money_token("-12.50"), Some(dec("-12.50")));
        assert_eq!(parse_money_token(".50"), Some(dec("0.50")));
        assert_eq!(parse_money_token("7."), Some(dec("7")));
        assert_eq!(parse_money_token("0.00"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_currency_symbols_and_separators() {
        assert_eq!(parse_money_token("$1,250.00"), Some(dec("1250.00")));
        assert_eq!(parse_money_token("$45"), Some(dec("45")));
        assert_eq!(parse_money_token("12,345,678.90"), Some(dec("12345678.90")));
    }

    #[test]
    fn test_trailing_minus() {
        assert_eq!(parse_money_token("100.00-"), Some(dec("-100.00")));
        assert_eq!(parse_money_token("$1,000.01-"), Some(dec("-1000.01")));
        assert_eq!(parse_money_token("-100.00-"), None);
    }

    #[test]
    fn test_parenthesized_negative() {
        assert_eq!(parse_money_token("(45.00)"), Some(dec("-45.00")));
        assert_eq!(parse_money_token("($1,200.00)"), Some(dec("-1200.00")));
        assert_eq!(parse_money_token("(-45.00)"), None);
    }

    #[test]
    fn test_not_money() {
        for token in ["Medical", "401(k)", "", "$", "-", "--", "1.2.3", "1e5", "inf", "NaN", "12a"] {
            assert_eq!(parse_money_token(token), None, "token {token:?}");
        }
    }

    #[test]
    fn test_out_of_range_is_not_money() {
        assert_eq!(parse_money_token("99999999999999999999999999999999999"), None);
    }
}
