//! Keyword re-scan recovering items the segmenter could not isolate.

use tracing::trace;

use super::{CategoryMap, ExtractedItem, ItemSource, PayslipLine};

/// Re-scan a line for every configured keyword not already captured.
///
/// `captured` holds the items found so far on this line, starting with the
/// segmenter's output; recovered items are appended to it so a later keyword
/// never duplicates an earlier one. Only the first token containing a keyword
/// is considered.
pub fn recover_keyword_items(
    line: &PayslipLine<'_>,
    categories: &CategoryMap,
    captured: &mut Vec<ExtractedItem>,
) {
    for keyword in categories.keywords() {
        let keyword_lower = keyword.to_lowercase();
        if !line.lower().contains(&keyword_lower) {
            continue;
        }

        let Some(position) = line
            .tokens()
            .iter()
            .position(|t| t.to_lowercase().contains(&keyword_lower))
        else {
            continue;
        };

        if captured.iter().any(|item| item.mentions(keyword)) {
            continue;
        }

        let (start, end) = name_span(line, position);
        let name = line.join(start, end + 1);

        let Some(amount) = line.period_amount_after(end) else {
            continue;
        };
        let Some(category) = categories.classify(&name) else {
            continue;
        };

        trace!("Recovered {:?} -> {} ({}) via {:?}", name, amount, category, keyword);

        captured.push(ExtractedItem {
            category: category.to_string(),
            name,
            amount,
            source: ItemSource::Recovery,
        });
    }
}

/// Widen from `position` over neighbouring non-money tokens.
fn name_span(line: &PayslipLine<'_>, position: usize) -> (usize, usize) {
    let mut start = position;
    while start > 0 && !line.is_money(start - 1) {
        start -= 1;
    }

    let mut end = position;
    while end + 1 < line.len() && !line.is_money(end + 1) {
        end += 1;
    }

    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payslip::rules::{extract_line_items, extract_segment_items};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn section_125() -> CategoryMap {
        CategoryMap::empty().with_category("Pre-Tax:Section 125", ["125"])
    }

    #[test]
    fn test_recovers_name_split_by_numeric_token() {
        let line = PayslipLine::new("Sec 125 Plan 30.00 360.00");
        let categories = section_125();

        assert!(extract_segment_items(&line, &categories).is_empty());

        let items = extract_line_items(&line, &categories);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Sec 125 Plan");
        assert_eq!(items[0].amount, dec("30.00"));
        assert_eq!(items[0].category, "Pre-Tax:Section 125");
        assert_eq!(items[0].source, ItemSource::Recovery);
    }

    #[test]
    fn test_later_keyword_sees_recovered_item() {
        let categories = CategoryMap::empty()
            .with_category("Pre-Tax:Section 125", ["125"])
            .with_category("Other", ["25"]);

        let items = extract_line_items(&PayslipLine::new("Sec 125 Plan 30.00 360.00"), &categories);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "Pre-Tax:Section 125");
    }

    #[test]
    fn test_only_first_occurrence_per_keyword() {
        let line = PayslipLine::new("Sec 125 5.00 Sec 125 7.00 99.00");
        let items = extract_line_items(&line, &section_125());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Sec 125");
        assert_eq!(items[0].amount, dec("5.00"));
    }

    #[test]
    fn test_does_not_duplicate_segmenter_items() {
        let line = PayslipLine::new("Medical 45.00 540.00");
        let items = extract_line_items(&line, &CategoryMap::default());

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, ItemSource::Segment);
    }

    #[test]
    fn test_shared_keyword_captured_once() {
        let categories = CategoryMap::empty()
            .with_category("A", ["medical"])
            .with_category("B", ["MEDICAL"]);

        let line = PayslipLine::new("Medical 45.00 540.00");
        let items = extract_line_items(&line, &categories);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "A");
    }

    #[test]
    fn test_keyword_spanning_tokens_is_not_recovered() {
        let categories = CategoryMap::empty().with_category("Taxes", ["ss tax"]);
        let mut captured = Vec::new();

        recover_keyword_items(&PayslipLine::new("SS Tax 12.00 144.00"), &categories, &mut captured);
        assert!(captured.is_empty());
    }

    #[test]
    fn test_recovered_without_amount_is_skipped() {
        let line = PayslipLine::new("Sec 125 Plan 360.00");
        assert!(extract_line_items(&line, &section_125()).is_empty());
    }

    #[test]
    fn test_rescan_is_idempotent() {
        let categories = section_125();
        let line = PayslipLine::new("Sec 125 Plan 30.00 360.00 Medical 2.00 24.00");

        let first = extract_line_items(&line, &categories);
        let second = extract_line_items(&line, &categories);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_token_line_yields_nothing() {
        let line = PayslipLine::new("Medical");
        assert!(extract_line_items(&line, &CategoryMap::default()).is_empty());
    }
}
