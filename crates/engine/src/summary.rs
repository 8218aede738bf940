use std::collections::BTreeMap;

use crate::model::{MatchResult, MatchStatus, RunSummary};

/// Fold results into a summary in one pass.
///
/// `status_counts` is seeded with every status so zero counts still
/// appear in reports, and the counts always sum back to `total`.
pub fn compute_summary(results: &[MatchResult]) -> RunSummary {
    let mut status_counts: BTreeMap<String, usize> = MatchStatus::ALL
        .iter()
        .map(|s| (s.to_string(), 0))
        .collect();

    let mut validated = 0usize;
    let mut mismatched = 0usize;
    let mut not_found = 0usize;
    let mut no_date = 0usize;

    for result in results {
        if let Some(count) = status_counts.get_mut(&result.status.to_string()) {
            *count += 1;
        }
        match result.status {
            s if s.is_validated() => validated += 1,
            MatchStatus::LargeDifference => mismatched += 1,
            MatchStatus::NotFound => not_found += 1,
            MatchStatus::NoDateAvailable | MatchStatus::DateParseError => no_date += 1,
            _ => {}
        }
    }

    RunSummary {
        total: results.len(),
        validated,
        mismatched,
        not_found,
        no_date,
        status_counts,
    }
}
