//! Budget transaction records produced from a payslip.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category used for the synthetic gross-pay offset records.
pub const OFFSET_CATEGORY: &str = "Income:Gross Pay Offset";

/// Memo of the record balancing itemized deductions.
pub const DEDUCTION_OFFSET_MEMO: &str = "Offset for itemized paycheck deductions";

/// Memo of the record balancing itemized additions.
pub const ADDITION_OFFSET_MEMO: &str =
    "Offset for itemized paycheck additions (employer contributions)";

/// A single budget transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Processing date (payslips carry no per-item transaction date).
    pub date: NaiveDate,

    /// Payee shared by every record of a document.
    pub payee: String,

    /// Budget category, possibly a `Group:Subcategory` path.
    pub category: String,

    /// Cleaned item name as printed on the payslip.
    pub memo: String,

    /// Signed amount with exactly two fractional digits.
    /// Negative amounts are deductions, positive amounts are additions.
    pub amount: Decimal,
}

impl TransactionRecord {
    /// Create a record, normalizing the amount to two decimal places.
    pub fn new(
        date: NaiveDate,
        payee: impl Into<String>,
        category: impl Into<String>,
        memo: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            payee: payee.into(),
            category: category.into(),
            memo: memo.into(),
            amount: to_cents(amount),
        }
    }

    /// Whether this is one of the synthetic gross-pay offsets.
    pub fn is_offset(&self) -> bool {
        self.category == OFFSET_CATEGORY
            && (self.memo == DEDUCTION_OFFSET_MEMO || self.memo == ADDITION_OFFSET_MEMO)
    }

    /// Whether money was withheld from pay.
    pub fn is_deduction(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Amount as a `-12.34` style string.
    pub fn amount_string(&self) -> String {
        format!("{:.2}", self.amount)
    }

    /// Date in `YYYY-MM-DD` form.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Running document totals. Both values are non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipTotals {
    /// Sum of the absolute values of all deductions.
    pub deductions: Decimal,
    /// Sum of all additions.
    pub additions: Decimal,
}

impl PayslipTotals {
    /// Account for one record amount.
    pub fn record(&mut self, amount: Decimal) {
        if amount.is_sign_negative() {
            self.deductions += amount.abs();
        } else {
            self.additions += amount;
        }
    }

    /// Offset records balancing the itemized totals, deductions first.
    pub fn offsets(&self, date: NaiveDate, payee: &str) -> Vec<TransactionRecord> {
        let mut offsets = Vec::with_capacity(2);

        if self.deductions > Decimal::ZERO {
            offsets.push(TransactionRecord::new(
                date,
                payee,
                OFFSET_CATEGORY,
                DEDUCTION_OFFSET_MEMO,
                self.deductions,
            ));
        }

        if self.additions > Decimal::ZERO {
            offsets.push(TransactionRecord::new(
                date,
                payee,
                OFFSET_CATEGORY,
                ADDITION_OFFSET_MEMO,
                -self.additions,
            ));
        }

        offsets
    }
}

/// Round to cents and pin the scale so the value always prints two digits.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded
}
