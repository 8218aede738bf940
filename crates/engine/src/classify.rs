use chrono::NaiveDate;

use crate::model::MatchStatus;

/// Map an absolute day delta to its proximity bucket.
///
/// Bounds are inclusive: 0 exact, 1 close, 2..=7 week, 8..=30 month,
/// 31+ large.
pub fn status_for_delta(delta_days: i64) -> MatchStatus {
    match delta_days {
        0 => MatchStatus::ExactMatch,
        1 => MatchStatus::CloseMatch,
        2..=7 => MatchStatus::WeekMatch,
        8..=30 => MatchStatus::MonthMatch,
        _ => MatchStatus::LargeDifference,
    }
}

/// Deterministic human-readable note for a result row. Same inputs,
/// same text; reports diff cleanly across runs.
pub fn note_for(
    status: MatchStatus,
    expected: Option<NaiveDate>,
    matched: Option<NaiveDate>,
    delta_days: Option<i64>,
) -> String {
    match status {
        MatchStatus::ExactMatch => "meeting date matches exactly".to_string(),
        MatchStatus::CloseMatch | MatchStatus::WeekMatch | MatchStatus::MonthMatch => {
            match (expected, matched, delta_days) {
                (Some(e), Some(m), Some(d)) => {
                    format!("expected {e}, nearest meeting {m} ({d} days off)")
                }
                _ => "meeting date within range".to_string(),
            }
        }
        MatchStatus::LargeDifference => match (expected, matched, delta_days) {
            (Some(e), Some(m), Some(d)) => {
                format!("expected {e}, nearest meeting {m} is {d} days away")
            }
            _ => "nearest meeting more than 30 days away".to_string(),
        },
        MatchStatus::NoDateAvailable => "no meeting date available to compare".to_string(),
        MatchStatus::DateParseError => "a date was present but could not be parsed".to_string(),
        MatchStatus::NotFound => "no meeting records found for ticker".to_string(),
    }
}
