//! Tokenized view of a single payslip text line.

use rust_decimal::Decimal;

use super::money::parse_money_token;

/// One line of extracted text, split into whitespace-delimited tokens.
///
/// Every token is parsed once up front so both extraction passes share the
/// same money/non-money view of the line.
#[derive(Debug, Clone)]
pub struct PayslipLine<'a> {
    text: &'a str,
    lower: String,
    tokens: Vec<&'a str>,
    values: Vec<Option<Decimal>>,
}

impl<'a> PayslipLine<'a> {
    pub fn new(text: &'a str) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let values = tokens.iter().map(|t| parse_money_token(t)).collect();

        Self {
            text,
            lower: text.to_lowercase(),
            tokens,
            values,
        }
    }

    /// Raw line text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Lowercased line text.
    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn tokens(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the token at `index` is a monetary amount.
    pub fn is_money(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(Option::is_some)
    }

    /// Tokens `start..end` joined by single spaces.
    pub fn join(&self, start: usize, end: usize) -> String {
        self.tokens[start..end].join(" ")
    }

    /// First current-period amount strictly after token `after`.
    ///
    /// The final token is the year-to-date column and always counts as zero.
    /// Zero amounts and non-money tokens are passed over.
    pub fn period_amount_after(&self, after: usize) -> Option<Decimal> {
        let last = self.tokens.len().checked_sub(1)?;

        ((after + 1)..self.tokens.len())
            .filter(|&j| j != last)
            .filter_map(|j| self.values[j])
            .find(|v| !v.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tokens_and_money_flags() {
        let line = PayslipLine::new("  Dental   12.00  144.00 ");
        assert_eq!(line.tokens(), &["Dental", "12.00", "144.00"]);
        assert!(!line.is_money(0));
        assert!(line.is_money(1));
        assert!(!line.is_money(3));
        assert_eq!(line.lower(), "  dental   12.00  144.00 ");
    }

    #[test]
    fn test_period_amount_skips_zero_and_ytd() {
        let line = PayslipLine::new("Vision 0.00 abc 3.25 39.00");
        assert_eq!(line.period_amount_after(0), Some(Decimal::from_str("3.25").unwrap()));

        let only_ytd = PayslipLine::new("Vision 39.00");
        assert_eq!(only_ytd.period_amount_after(0), None);
    }

    #[test]
    fn test_period_amount_at_end_of_line() {
        let line = PayslipLine::new("Vision 3.25");
        assert_eq!(line.period_amount_after(1), None);
        assert_eq!(PayslipLine::new("").period_amount_after(0), None);
    }
}
