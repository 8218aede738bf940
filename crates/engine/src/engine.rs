use chrono::Utc;

use crate::classify::{note_for, status_for_delta};
use crate::index::CandidateIndex;
use crate::matcher::{select_best_match, MatchOutcome};
use crate::model::{
    CandidateRecord, DateField, MatchResult, MatchStatus, ReconReport, ReferenceRecord, RunMeta,
};
use crate::summary::compute_summary;
use crate::ticker::normalize_ticker;

/// Reconcile a reference list against a candidate set.
///
/// Total: every reference record yields exactly one result, and bad
/// dates or unknown tickers come back as statuses rather than errors.
/// The candidate index is built once and shared across records.
pub fn run(references: &[ReferenceRecord], candidates: Vec<CandidateRecord>) -> ReconReport {
    let candidate_count = candidates.len();
    let index = CandidateIndex::build(candidates);

    let results: Vec<MatchResult> = references
        .iter()
        .map(|reference| evaluate(reference, &index))
        .collect();

    let summary = compute_summary(&results);

    ReconReport {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: Utc::now().to_rfc3339(),
            reference_count: references.len(),
            candidate_count,
        },
        summary,
        results,
    }
}

fn evaluate(reference: &ReferenceRecord, index: &CandidateIndex) -> MatchResult {
    let clean_ticker = normalize_ticker(&reference.ticker);
    let group = index.lookup(&clean_ticker);
    let expected = reference.expected_date.as_parsed();

    let mut matched_date = None;
    let mut delta_days = None;
    let mut candidate_fields = None;

    let status = if group.is_empty() {
        MatchStatus::NotFound
    } else {
        match &reference.expected_date {
            DateField::Missing => MatchStatus::NoDateAvailable,
            DateField::Invalid(_) => MatchStatus::DateParseError,
            DateField::Parsed(expected) => match select_best_match(*expected, group) {
                MatchOutcome::Best(best) => {
                    matched_date = Some(best.matched_date);
                    delta_days = Some(best.delta_days);
                    candidate_fields = Some(best.candidate.fields.clone());
                    status_for_delta(best.delta_days)
                }
                MatchOutcome::NoUsableDate { saw_invalid: true } => MatchStatus::DateParseError,
                MatchOutcome::NoUsableDate { saw_invalid: false } => MatchStatus::NoDateAvailable,
            },
        }
    };

    let note = note_for(status, expected, matched_date, delta_days);

    MatchResult {
        ticker: reference.ticker.clone(),
        clean_ticker,
        company: reference.company.clone(),
        status,
        expected_date: expected,
        matched_date,
        delta_days,
        candidate_fields,
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn reference(ticker: &str, date: Option<&str>) -> ReferenceRecord {
        ReferenceRecord {
            ticker: ticker.into(),
            company: format!("{ticker} Inc"),
            expected_date: DateField::parse(date),
        }
    }

    fn candidate(ticker: &str, date: Option<&str>) -> CandidateRecord {
        let mut fields = HashMap::new();
        fields.insert("company_name".to_string(), format!("{ticker} Incorporated"));
        CandidateRecord {
            ticker: ticker.into(),
            meeting_date: DateField::parse(date),
            fields,
        }
    }

    #[test]
    fn exact_match_on_decorated_ticker() {
        let report = run(
            &[reference("ABCD-US", Some("2025-03-10"))],
            vec![candidate("ABCD", Some("2025-03-10"))],
        );
        let r = &report.results[0];
        assert_eq!(r.status, MatchStatus::ExactMatch);
        assert_eq!(r.clean_ticker, "ABCD");
        assert_eq!(r.delta_days, Some(0));
        assert!(r.candidate_fields.is_some());
    }

    #[test]
    fn picks_nearest_of_two_meetings() {
        let report = run(
            &[reference("WXYZ-US", Some("2025-03-10"))],
            vec![
                candidate("WXYZ", Some("2025-03-05")),
                candidate("WXYZ", Some("2025-03-12")),
            ],
        );
        let r = &report.results[0];
        assert_eq!(r.status, MatchStatus::WeekMatch);
        assert_eq!(r.delta_days, Some(2));
        assert_eq!(r.matched_date.unwrap().to_string(), "2025-03-12");
    }

    #[test]
    fn unknown_ticker_is_not_found() {
        let report = run(
            &[reference("NOPE-US", Some("2025-03-10"))],
            vec![candidate("ABCD", Some("2025-03-10"))],
        );
        let r = &report.results[0];
        assert_eq!(r.status, MatchStatus::NotFound);
        assert!(r.matched_date.is_none());
        assert!(r.candidate_fields.is_none());
    }

    #[test]
    fn unparseable_expected_date() {
        let report = run(
            &[reference("ABCD", Some("March-ish 2025"))],
            vec![candidate("ABCD", Some("2025-03-10"))],
        );
        assert_eq!(report.results[0].status, MatchStatus::DateParseError);
    }

    #[test]
    fn missing_expected_date() {
        let report = run(
            &[reference("ABCD", None)],
            vec![candidate("ABCD", Some("2025-03-10"))],
        );
        assert_eq!(report.results[0].status, MatchStatus::NoDateAvailable);
    }

    #[test]
    fn candidates_without_dates_split_on_invalid() {
        let report = run(
            &[
                reference("ABCD", Some("2025-03-10")),
                reference("WXYZ", Some("2025-03-10")),
            ],
            vec![candidate("ABCD", None), candidate("WXYZ", Some("soonish"))],
        );
        assert_eq!(report.results[0].status, MatchStatus::NoDateAvailable);
        assert_eq!(report.results[1].status, MatchStatus::DateParseError);
    }

    #[test]
    fn not_found_wins_over_bad_expected_date() {
        // Zero candidates for the key means not_found regardless of the
        // reference row's own date problems.
        let report = run(&[reference("GONE", Some("garbage"))], vec![]);
        assert_eq!(report.results[0].status, MatchStatus::NotFound);
    }

    #[test]
    fn one_result_per_reference_and_counts_conserve() {
        let references = vec![
            reference("ABCD-US", Some("2025-03-10")),
            reference("WXYZ-US", Some("2025-03-10")),
            reference("NOPE-US", Some("2025-03-10")),
            reference("QRST", None),
        ];
        let candidates = vec![
            candidate("ABCD", Some("2025-03-10")),
            candidate("WXYZ", Some("2025-04-20")),
            candidate("QRST", Some("2025-06-01")),
        ];
        let report = run(&references, candidates);
        assert_eq!(report.results.len(), references.len());
        assert_eq!(report.summary.total, references.len());
        assert_eq!(
            report.summary.status_counts.values().sum::<usize>(),
            report.summary.total
        );
        assert_eq!(report.meta.reference_count, 4);
        assert_eq!(report.meta.candidate_count, 3);
    }

    #[test]
    fn delta_buckets_end_to_end() {
        let cases = [
            ("2025-03-10", MatchStatus::ExactMatch),
            ("2025-03-11", MatchStatus::CloseMatch),
            ("2025-03-17", MatchStatus::WeekMatch),
            ("2025-03-18", MatchStatus::MonthMatch),
            ("2025-04-09", MatchStatus::MonthMatch),
            ("2025-04-10", MatchStatus::LargeDifference),
        ];
        for (meeting, expected_status) in cases {
            let report = run(
                &[reference("ABCD", Some("2025-03-10"))],
                vec![candidate("ABCD", Some(meeting))],
            );
            assert_eq!(report.results[0].status, expected_status, "meeting {meeting}");
        }
    }
}
