use chrono::NaiveDate;

use crate::model::CandidateRecord;

/// The winning candidate from a best-match scan.
#[derive(Debug)]
pub struct BestMatch<'a> {
    pub candidate: &'a CandidateRecord,
    pub matched_date: NaiveDate,
    pub delta_days: i64,
}

/// Outcome of scanning one candidate group against an expected date.
#[derive(Debug)]
pub enum MatchOutcome<'a> {
    Best(BestMatch<'a>),
    /// No candidate carried a parseable date. `saw_invalid` separates
    /// "a date was present but broken" from "no dates at all".
    NoUsableDate { saw_invalid: bool },
}

/// Pick the candidate whose meeting date is nearest the expected date.
///
/// Linear scan; a candidate replaces the incumbent only on a strictly
/// smaller absolute day delta, so ties go to the earlier record.
/// Candidates without a parsed date are skipped.
pub fn select_best_match<'a>(
    expected: NaiveDate,
    candidates: &'a [CandidateRecord],
) -> MatchOutcome<'a> {
    let mut best: Option<BestMatch<'a>> = None;
    let mut saw_invalid = false;

    for candidate in candidates {
        let Some(date) = candidate.meeting_date.as_parsed() else {
            if candidate.meeting_date.is_invalid() {
                saw_invalid = true;
            }
            continue;
        };
        let delta = date.signed_duration_since(expected).num_days().abs();
        let better = match &best {
            Some(b) => delta < b.delta_days,
            None => true,
        };
        if better {
            best = Some(BestMatch {
                candidate,
                matched_date: date,
                delta_days: delta,
            });
        }
    }

    match best {
        Some(b) => MatchOutcome::Best(b),
        None => MatchOutcome::NoUsableDate { saw_invalid },
    }
}
