//! Reference list import.
//!
//! Reads the "expected" side of a run from an xlsx or csv file. Column
//! positions are resolved from the header row by configured name, rows
//! with an empty ticker cell are skipped and counted, and date cells may
//! be text in any accepted layout or native Excel datetimes.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::info;

use proxyrecon_engine::config::ReferenceColumns;
use proxyrecon_engine::model::{DateField, ReferenceRecord};
use proxyrecon_engine::ReconError;

// ── XLSX ──

pub fn read_reference_xlsx(
    path: &Path,
    sheet: Option<&str>,
    columns: &ReferenceColumns,
) -> Result<(Vec<ReferenceRecord>, usize), ReconError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ReconError::Sheet(e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReconError::Sheet(format!("{} has no worksheets", path.display())))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::Sheet(format!("worksheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ReconError::Sheet(format!("worksheet '{sheet_name}' is empty")))?;

    let header_texts: Vec<String> = header
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    let [ticker_idx, company_idx, date_idx] = resolve_columns(path, &header_texts, columns)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        let ticker = row.get(ticker_idx).and_then(cell_text);
        let Some(ticker) = ticker else {
            skipped += 1;
            continue;
        };
        let company = row
            .get(company_idx)
            .and_then(cell_text)
            .unwrap_or_default();
        let expected_date = row.get(date_idx).map(cell_date).unwrap_or(DateField::Missing);
        records.push(ReferenceRecord {
            ticker,
            company,
            expected_date,
        });
    }

    info!(
        count = records.len(),
        skipped,
        file = %path.display(),
        "loaded reference rows"
    );
    Ok((records, skipped))
}

// ── CSV ──

pub fn read_reference_csv(
    path: &Path,
    columns: &ReferenceColumns,
) -> Result<(Vec<ReferenceRecord>, usize), ReconError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ReconError::Io(e.to_string()))?;

    let header_texts: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let [ticker_idx, company_idx, date_idx] = resolve_columns(path, &header_texts, columns)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row.map_err(|e| ReconError::Io(e.to_string()))?;
        let ticker = row.get(ticker_idx).map(str::trim).filter(|t| !t.is_empty());
        let Some(ticker) = ticker else {
            skipped += 1;
            continue;
        };
        records.push(ReferenceRecord {
            ticker: ticker.to_string(),
            company: row
                .get(company_idx)
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            expected_date: DateField::parse(row.get(date_idx)),
        });
    }

    info!(
        count = records.len(),
        skipped,
        file = %path.display(),
        "loaded reference rows"
    );
    Ok((records, skipped))
}

// ── Shared helpers ──

/// Resolve configured column names to header indices. Header cells are
/// trim-compared against the configured names.
fn resolve_columns(
    path: &Path,
    header: &[String],
    columns: &ReferenceColumns,
) -> Result<[usize; 3], ReconError> {
    let find = |name: &str| -> Result<usize, ReconError> {
        header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| ReconError::MissingColumn {
                file: path.display().to_string(),
                column: name.to_string(),
            })
    };
    Ok([
        find(&columns.ticker)?,
        find(&columns.company)?,
        find(&columns.date)?,
    ])
}

/// Trimmed non-empty text of a cell, if any.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) => {
            if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => d.date().to_string(),
            None => return None,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Date interpretation of a cell. Native Excel datetimes come through as
/// parsed dates directly; everything else goes through the text parser.
fn cell_date(cell: &Data) -> DateField {
    match cell {
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => DateField::Parsed(d.date()),
            None => DateField::Invalid(format!("{dt:?}")),
        },
        other => DateField::parse(cell_text(other).as_deref()),
    }
}
