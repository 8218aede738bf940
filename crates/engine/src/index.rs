use std::collections::HashMap;

use crate::model::CandidateRecord;
use crate::ticker::normalize_ticker;

/// Candidate records grouped by normalized ticker.
///
/// Grouping is stable: within a key, records keep the order they arrived
/// in. Best-match tie-breaking downstream depends on that order.
#[derive(Debug, Default)]
pub struct CandidateIndex {
    groups: HashMap<String, Vec<CandidateRecord>>,
    total: usize,
    dropped_empty_keys: usize,
}

impl CandidateIndex {
    /// Group candidates by normalized key. Records whose ticker
    /// normalizes to empty can never be looked up, so they are dropped
    /// here and counted.
    pub fn build(candidates: Vec<CandidateRecord>) -> Self {
        let mut groups: HashMap<String, Vec<CandidateRecord>> = HashMap::new();
        let mut total = 0usize;
        let mut dropped = 0usize;

        for record in candidates {
            let key = normalize_ticker(&record.ticker);
            if key.is_empty() {
                dropped += 1;
                continue;
            }
            total += 1;
            groups.entry(key).or_default().push(record);
        }

        CandidateIndex {
            groups,
            total,
            dropped_empty_keys: dropped,
        }
    }

    /// Look up candidates for a key. The key is normalized here, so raw
    /// and already-clean forms resolve identically. Absent keys return
    /// an empty slice.
    pub fn lookup(&self, key: &str) -> &[CandidateRecord] {
        let clean = normalize_ticker(key);
        self.groups.get(&clean).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed candidates (dropped empty-key records excluded).
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn dropped_empty_keys(&self) -> usize {
        self.dropped_empty_keys
    }
}
