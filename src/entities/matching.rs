//! Local scoring of a symptom selection against every catalog record.

use std::collections::HashSet;

use crate::entities::catalog::Catalog;
use crate::entities::condition::{ConditionRecord, Prediction};
use crate::entities::selection::SelectionSet;

pub const MAX_RESULTS: usize = 10;

/// Percentage of a record's symptoms present in `selected` (already
/// lowercased). Records without symptoms score 0.
///
/// The divisor counts the record's symptoms after normalization, which has
/// already dropped blank and non-string entries: a source listing
/// `["fever", ""]` yields a one-symptom record, so `fever` scores 100%.
fn match_percentage(record: &ConditionRecord, selected: &HashSet<String>) -> f64 {
    let overlap = record
        .symptoms
        .iter()
        .filter(|s| selected.contains(&s.to_lowercase()))
        .count();
    let base = record.symptoms.len().max(1);
    overlap as f64 / base as f64 * 100.0
}

/// Ranks catalog records by symptom overlap with the selection.
///
/// Records with no overlap are dropped, the rest are sorted by descending
/// match percentage and capped at [`MAX_RESULTS`]. Equal percentages keep
/// catalog insertion order.
pub fn score(catalog: &Catalog, selection: &SelectionSet) -> Vec<Prediction> {
    let selected: HashSet<String> = selection.iter().map(str::to_lowercase).collect();
    if selected.is_empty() {
        return Vec::new();
    }

    let mut predictions: Vec<Prediction> = catalog
        .iter()
        .filter_map(|record| {
            let pct = match_percentage(record, &selected);
            (pct > 0.0).then(|| Prediction::from_record(record, pct))
        })
        .collect();

    // Stable sort: ties stay in catalog order.
    predictions.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    predictions.truncate(MAX_RESULTS);
    predictions
}
