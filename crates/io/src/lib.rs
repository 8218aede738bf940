//! File I/O for reconciliation runs: reference list import (xlsx, csv)
//! and report export (multi-sheet xlsx, flat csv).
//!
//! Import is one-way: files are converted to engine records and never
//! written back. The exported workbook is a presentation snapshot.

pub mod reference;
pub mod report;

pub use reference::{read_reference_csv, read_reference_xlsx};
pub use report::{write_report, write_results_csv};
