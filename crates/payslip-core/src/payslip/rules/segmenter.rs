//! Primary name/amount segmentation of a payslip line.

use tracing::trace;

use super::{CategoryMap, ExtractedItem, ItemSource, PayslipLine};

/// A run of consecutive non-money tokens, taken as an item name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSegment {
    /// Tokens joined by single spaces.
    pub name: String,
    /// Index of the first token.
    pub start: usize,
    /// Number of tokens.
    pub len: usize,
}

impl CandidateSegment {
    /// Index of the last name token.
    pub fn last(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Split a line into name segments separated by money tokens.
///
/// The money tokens themselves belong to no segment.
pub fn segment_line(line: &PayslipLine<'_>) -> Vec<CandidateSegment> {
    let mut segments = Vec::new();
    let mut start = None;

    for i in 0..line.len() {
        match (line.is_money(i), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                segments.push(CandidateSegment {
                    name: line.join(s, i),
                    start: s,
                    len: i - s,
                });
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        segments.push(CandidateSegment {
            name: line.join(s, line.len()),
            start: s,
            len: line.len() - s,
        });
    }

    segments
}

/// Classify each segment and pair it with its first current-period amount.
///
/// Unclassified segments and segments without a qualifying amount are dropped.
pub fn extract_segment_items(line: &PayslipLine<'_>, categories: &CategoryMap) -> Vec<ExtractedItem> {
    segment_line(line)
        .into_iter()
        .filter_map(|segment| {
            let name = segment.name.replace('*', "");
            let category = categories.classify(&name)?;
            let amount = line.period_amount_after(segment.last())?;

            trace!("Segment {:?} -> {} ({})", name, amount, category);

            Some(ExtractedItem {
                category: category.to_string(),
                name,
                amount,
                source: ItemSource::Segment,
            })
        })
        .collect()
}
