use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Date input
// ---------------------------------------------------------------------------

/// Accepted date layouts, tried in order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A date field as it arrived from a source: absent, present but
/// unparseable, or parsed. The distinction drives `no_date_available`
/// vs `date_parse_error` downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateField {
    Missing,
    Invalid(String),
    Parsed(NaiveDate),
}

impl DateField {
    /// Build from an optional raw cell. Whitespace-only counts as missing;
    /// a non-empty string that matches none of the accepted layouts is
    /// `Invalid` and keeps the raw text for the report.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return DateField::Missing;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return DateField::Missing;
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
                return DateField::Parsed(date);
            }
        }
        DateField::Invalid(trimmed.to_string())
    }

    pub fn as_parsed(&self) -> Option<NaiveDate> {
        match self {
            DateField::Parsed(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DateField::Invalid(_))
    }
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One row from the reference list (the "expected" side).
#[derive(Debug, Clone)]
pub struct ReferenceRecord {
    pub ticker: String,
    pub company: String,
    pub expected_date: DateField,
}

/// One candidate meeting row from a database or API source. `fields` is
/// an opaque payload (company name, proposal, outcome, ...) carried into
/// results verbatim and never consulted by matching.
#[derive(Debug, Clone)]
pub struct CandidateRecord {
    pub ticker: String,
    pub meeting_date: DateField,
    pub fields: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    ExactMatch,
    CloseMatch,
    WeekMatch,
    MonthMatch,
    LargeDifference,
    NoDateAvailable,
    DateParseError,
    NotFound,
}

impl MatchStatus {
    /// Every status, in report order. Summaries seed counts from this so
    /// zero-count statuses still appear.
    pub const ALL: [MatchStatus; 8] = [
        MatchStatus::ExactMatch,
        MatchStatus::CloseMatch,
        MatchStatus::WeekMatch,
        MatchStatus::MonthMatch,
        MatchStatus::LargeDifference,
        MatchStatus::NoDateAvailable,
        MatchStatus::DateParseError,
        MatchStatus::NotFound,
    ];

    /// True for the five statuses produced by an actual date comparison.
    pub fn is_delta_status(self) -> bool {
        matches!(
            self,
            MatchStatus::ExactMatch
                | MatchStatus::CloseMatch
                | MatchStatus::WeekMatch
                | MatchStatus::MonthMatch
                | MatchStatus::LargeDifference
        )
    }

    /// True for the four within-a-month statuses ("validated" in reports).
    pub fn is_validated(self) -> bool {
        matches!(
            self,
            MatchStatus::ExactMatch
                | MatchStatus::CloseMatch
                | MatchStatus::WeekMatch
                | MatchStatus::MonthMatch
        )
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExactMatch => write!(f, "exact_match"),
            Self::CloseMatch => write!(f, "close_match"),
            Self::WeekMatch => write!(f, "week_match"),
            Self::MonthMatch => write!(f, "month_match"),
            Self::LargeDifference => write!(f, "large_difference"),
            Self::NoDateAvailable => write!(f, "no_date_available"),
            Self::DateParseError => write!(f, "date_parse_error"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One result per reference record, always.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub ticker: String,
    pub clean_ticker: String,
    pub company: String,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_fields: Option<HashMap<String, String>>,
    pub note: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub validated: usize,
    pub mismatched: usize,
    pub not_found: usize,
    pub no_date: usize,
    pub status_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
    pub reference_count: usize,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub results: Vec<MatchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_iso_date() {
        assert_eq!(
            DateField::parse(Some("2025-03-10")),
            DateField::Parsed(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
        );
    }

    #[test]
    fn parse_us_and_slash_dates() {
        let expect = DateField::Parsed(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(DateField::parse(Some("03/10/2025")), expect);
        assert_eq!(DateField::parse(Some("2025/03/10")), expect);
    }

    #[test]
    fn parse_missing_vs_invalid() {
        assert_eq!(DateField::parse(None), DateField::Missing);
        assert_eq!(DateField::parse(Some("")), DateField::Missing);
        assert_eq!(DateField::parse(Some("   ")), DateField::Missing);
        assert_eq!(
            DateField::parse(Some("not-a-date")),
            DateField::Invalid("not-a-date".to_string())
        );
    }

    #[test]
    fn parse_trims_before_matching() {
        assert_eq!(
            DateField::parse(Some("  2025-03-10  ")),
            DateField::Parsed(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
        );
    }

    #[test]
    fn display_matches_serde() {
        for status in MatchStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }
}
