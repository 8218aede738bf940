//! SQLite storage layer for meeting candidates.
//!
//! Two tables: `company` holds one row per issuer, `meeting` one row per
//! scheduled meeting with an optional proposal. Candidate rows for a run
//! come from a fixed company-meeting join filtered by year; all query
//! construction lives here.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

use proxyrecon_engine::model::{CandidateRecord, DateField};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS company (
    id      INTEGER PRIMARY KEY,
    name    TEXT NOT NULL,
    symbol  TEXT NOT NULL,
    country TEXT
);
CREATE TABLE IF NOT EXISTS meeting (
    id           INTEGER PRIMARY KEY,
    company_id   INTEGER NOT NULL REFERENCES company(id),
    meeting_date TEXT,
    meeting_type TEXT,
    proposal     TEXT,
    year         INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_meeting_year ON meeting(year);
";

const CANDIDATE_QUERY: &str = "
SELECT c.symbol       AS symbol,
       c.name         AS company_name,
       c.country      AS country,
       m.meeting_date AS meeting_date,
       m.meeting_type AS meeting_type,
       m.proposal     AS proposal
FROM company c
JOIN meeting m ON m.company_id = c.id
WHERE m.year = ?1
ORDER BY c.symbol, m.meeting_date
";

/// Meeting store over a SQLite database.
///
/// Supports both file-backed and in-memory (test) modes.
pub struct MeetingStore {
    conn: Connection,
}

impl MeetingStore {
    /// Open or create a database file at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an ephemeral in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create tables and indexes if they do not exist yet.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// All candidate rows for a meeting year, ordered by symbol then
    /// date. Columns map by name; a NULL meeting date becomes a missing
    /// date field rather than being dropped.
    pub fn fetch_candidates(&self, year: i32) -> Result<Vec<CandidateRecord>, StoreError> {
        let mut stmt = self.conn.prepare(CANDIDATE_QUERY)?;
        let rows = stmt.query_map([year], |row| {
            let symbol: String = row.get("symbol")?;
            let meeting_date: Option<String> = row.get("meeting_date")?;

            let mut fields = HashMap::new();
            let mut field = |key: &str, value: Option<String>| {
                if let Some(value) = value {
                    fields.insert(key.to_string(), value);
                }
            };
            field("company_name", row.get("company_name")?);
            field("country", row.get("country")?);
            field("meeting_type", row.get("meeting_type")?);
            field("proposal", row.get("proposal")?);

            Ok(CandidateRecord {
                ticker: symbol,
                meeting_date: DateField::parse(meeting_date.as_deref()),
                fields,
            })
        })?;

        let candidates: Vec<CandidateRecord> = rows.collect::<Result<_, _>>()?;
        info!(count = candidates.len(), year, "fetched meeting candidates");
        Ok(candidates)
    }

    /// Insert one company row, returning its id.
    pub fn insert_company(
        &self,
        name: &str,
        symbol: &str,
        country: Option<&str>,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO company (name, symbol, country) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, symbol, country],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert one meeting row for a company.
    pub fn insert_meeting(
        &self,
        company_id: i64,
        meeting_date: Option<&str>,
        meeting_type: &str,
        proposal: Option<&str>,
        year: i32,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO meeting (company_id, meeting_date, meeting_type, proposal, year)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![company_id, meeting_date, meeting_type, proposal, year],
        )?;
        Ok(())
    }

    /// Number of meeting rows for a year.
    pub fn candidate_count(&self, year: i32) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM meeting WHERE year = ?1",
            [year],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
