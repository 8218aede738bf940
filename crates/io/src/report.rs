//! Report export.
//!
//! Renders a finished run as a multi-sheet workbook (summary, full
//! result list, validated subset, not-found subset) or a flat csv. No
//! styling beyond sheet layout; the workbook is data, not presentation.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use tracing::info;

use proxyrecon_engine::model::{MatchResult, MatchStatus, ReconReport};
use proxyrecon_engine::ReconError;

const RESULT_HEADER: [&str; 10] = [
    "Ticker",
    "Clean Ticker",
    "Company",
    "Status",
    "Expected Date",
    "Matched Date",
    "Delta Days",
    "DB Company",
    "Proposal",
    "Note",
];

// ── Workbook ──

pub fn write_report(path: &Path, report: &ReconReport) -> Result<(), ReconError> {
    let mut workbook = Workbook::new();

    write_summary_sheet(workbook.add_worksheet(), report).map_err(xlsx_err)?;

    let all = workbook.add_worksheet();
    all.set_name("All_Companies").map_err(xlsx_err)?;
    write_result_rows(all, report.results.iter()).map_err(xlsx_err)?;

    let validated = workbook.add_worksheet();
    validated.set_name("Validated").map_err(xlsx_err)?;
    write_result_rows(
        validated,
        report.results.iter().filter(|r| r.status.is_validated()),
    )
    .map_err(xlsx_err)?;

    let not_found = workbook.add_worksheet();
    not_found.set_name("Not_Found").map_err(xlsx_err)?;
    write_result_rows(
        not_found,
        report
            .results
            .iter()
            .filter(|r| r.status == MatchStatus::NotFound),
    )
    .map_err(xlsx_err)?;

    workbook.save(path).map_err(xlsx_err)?;
    info!(file = %path.display(), results = report.results.len(), "wrote report workbook");
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, report: &ReconReport) -> Result<(), XlsxError> {
    sheet.set_name("Summary")?;
    sheet.write_string(0, 0, "Metric")?;
    sheet.write_string(0, 1, "Value")?;

    let mut row = 1u32;
    let mut metric = |sheet: &mut Worksheet, name: &str, value: String| -> Result<(), XlsxError> {
        sheet.write_string(row, 0, name)?;
        sheet.write_string(row, 1, value.as_str())?;
        row += 1;
        Ok(())
    };

    let s = &report.summary;
    metric(sheet, "total", s.total.to_string())?;
    // Per-status counts in fixed order; zero counts are written too.
    for status in MatchStatus::ALL {
        let count = s.status_counts.get(&status.to_string()).copied().unwrap_or(0);
        metric(sheet, &status.to_string(), count.to_string())?;
    }
    metric(sheet, "validated", s.validated.to_string())?;
    metric(sheet, "mismatched", s.mismatched.to_string())?;
    metric(sheet, "not_found_total", s.not_found.to_string())?;
    metric(sheet, "no_date_total", s.no_date.to_string())?;
    metric(sheet, "run_at", report.meta.run_at.clone())?;
    metric(sheet, "engine_version", report.meta.engine_version.clone())?;
    Ok(())
}

fn write_result_rows<'a>(
    sheet: &mut Worksheet,
    results: impl Iterator<Item = &'a MatchResult>,
) -> Result<(), XlsxError> {
    for (col, name) in RESULT_HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, result) in results.enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in result_cells(result).into_iter().enumerate() {
            sheet.write_string(row, col as u16, value.as_str())?;
        }
    }
    Ok(())
}

// ── CSV ──

pub fn write_results_csv(path: &Path, results: &[MatchResult]) -> Result<(), ReconError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReconError::Io(e.to_string()))?;
    writer
        .write_record(RESULT_HEADER)
        .map_err(|e| ReconError::Io(e.to_string()))?;
    for result in results {
        writer
            .write_record(result_cells(result))
            .map_err(|e| ReconError::Io(e.to_string()))?;
    }
    writer.flush()?;
    info!(file = %path.display(), results = results.len(), "wrote results csv");
    Ok(())
}

// ── Shared ──

fn result_cells(result: &MatchResult) -> [String; 10] {
    let payload = |key: &str| -> String {
        result
            .candidate_fields
            .as_ref()
            .and_then(|f| f.get(key))
            .cloned()
            .unwrap_or_default()
    };
    [
        result.ticker.clone(),
        result.clean_ticker.clone(),
        result.company.clone(),
        result.status.to_string(),
        result.expected_date.map(|d| d.to_string()).unwrap_or_default(),
        result.matched_date.map(|d| d.to_string()).unwrap_or_default(),
        result.delta_days.map(|d| d.to_string()).unwrap_or_default(),
        payload("company_name"),
        payload("proposal"),
        result.note.clone(),
    ]
}

fn xlsx_err(e: XlsxError) -> ReconError {
    ReconError::Io(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto, Data, Reader};
    use chrono::NaiveDate;
    use proxyrecon_engine::model::{RunMeta, RunSummary};
    use proxyrecon_engine::summary::compute_summary;
    use std::collections::HashMap;

    fn result(ticker: &str, status: MatchStatus) -> MatchResult {
        let mut fields = HashMap::new();
        fields.insert("company_name".to_string(), format!("{ticker} Incorporated"));
        fields.insert("proposal".to_string(), "Elect directors".to_string());
        MatchResult {
            ticker: format!("{ticker}-US"),
            clean_ticker: ticker.to_string(),
            company: format!("{ticker} Inc"),
            status,
            expected_date: NaiveDate::from_ymd_opt(2025, 3, 10),
            matched_date: if status.is_delta_status() {
                NaiveDate::from_ymd_opt(2025, 3, 12)
            } else {
                None
            },
            delta_days: if status.is_delta_status() { Some(2) } else { None },
            candidate_fields: if status == MatchStatus::NotFound {
                None
            } else {
                Some(fields)
            },
            note: "n".to_string(),
        }
    }

    fn report(results: Vec<MatchResult>) -> ReconReport {
        let summary: RunSummary = compute_summary(&results);
        ReconReport {
            meta: RunMeta {
                engine_version: "0.3.0".into(),
                run_at: "2025-03-10T00:00:00+00:00".into(),
                reference_count: results.len(),
                candidate_count: 0,
            },
            summary,
            results,
        }
    }

    #[test]
    fn workbook_has_all_four_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let report = report(vec![
            result("ABCD", MatchStatus::ExactMatch),
            result("WXYZ", MatchStatus::WeekMatch),
            result("NOPE", MatchStatus::NotFound),
            result("FARR", MatchStatus::LargeDifference),
        ]);
        write_report(&path, &report).unwrap();

        let workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(
            workbook.sheet_names(),
            ["Summary", "All_Companies", "Validated", "Not_Found"]
        );
    }

    #[test]
    fn sheets_filter_by_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let report = report(vec![
            result("ABCD", MatchStatus::ExactMatch),
            result("WXYZ", MatchStatus::WeekMatch),
            result("NOPE", MatchStatus::NotFound),
            result("FARR", MatchStatus::LargeDifference),
        ]);
        write_report(&path, &report).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        for (name, expected) in [("All_Companies", 4), ("Validated", 2), ("Not_Found", 1)] {
            let range = workbook.worksheet_range(name).unwrap();
            assert_eq!(range.rows().count() - 1, expected, "sheet {name}");
        }
    }

    #[test]
    fn summary_sheet_lists_every_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let report = report(vec![result("ABCD", MatchStatus::ExactMatch)]);
        write_report(&path, &report).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        let range = workbook.worksheet_range("Summary").unwrap();
        let metrics: Vec<String> = range
            .rows()
            .skip(1)
            .filter_map(|row| match &row[0] {
                Data::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect();
        for status in MatchStatus::ALL {
            assert!(metrics.contains(&status.to_string()), "missing {status}");
        }
    }

    #[test]
    fn csv_export_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let results = vec![
            result("ABCD", MatchStatus::ExactMatch),
            result("NOPE", MatchStatus::NotFound),
        ];
        write_results_csv(&path, &results).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "ABCD-US");
        assert_eq!(&rows[0][3], "exact_match");
        assert_eq!(&rows[0][7], "ABCD Incorporated");
        assert_eq!(&rows[1][3], "not_found");
        assert_eq!(&rows[1][7], "");
    }
}
