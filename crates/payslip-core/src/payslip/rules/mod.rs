//! Rule-based extraction of payslip line items.

pub mod categories;
pub mod line;
pub mod money;
pub mod patterns;
pub mod recovery;
pub mod segmenter;

pub use categories::CategoryMap;
pub use line::PayslipLine;
pub use money::parse_money_token;
pub use recovery::recover_keyword_items;
pub use segmenter::{CandidateSegment, segment_line, extract_segment_items};

use rust_decimal::Decimal;

/// Which extraction pass produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// Name/number alternation of the line segmenter.
    Segment,
    /// Keyword re-scan of the recovery pass.
    Recovery,
}

/// A deduction or addition found on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    /// Item name as printed.
    pub name: String,
    /// Signed current-period amount, never zero.
    pub amount: Decimal,
    /// Category the name classified into.
    pub category: String,
    /// Pass that produced the item.
    pub source: ItemSource,
}

impl ExtractedItem {
    /// Whether the item name contains `keyword`, ignoring case.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.name.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Run both extraction passes over one line.
///
/// Lines with fewer than two tokens cannot pair a name with an amount.
pub fn extract_line_items(line: &PayslipLine<'_>, categories: &CategoryMap) -> Vec<ExtractedItem> {
    if line.len() < 2 {
        return Vec::new();
    }

    let mut items = extract_segment_items(line, categories);
    recover_keyword_items(line, categories, &mut items);
    items
}
