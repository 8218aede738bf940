//! `proxyrecon-engine` — meeting-date reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded reference and candidate records,
//! returns classified match results. No CLI, database, or file dependencies.
//! Ticker or date problems in the data surface as statuses, never as errors.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod summary;
pub mod ticker;

pub use config::JobConfig;
pub use engine::run;
pub use error::ReconError;
pub use model::{
    CandidateRecord, DateField, MatchResult, MatchStatus, ReconReport, ReferenceRecord, RunSummary,
};
pub use ticker::normalize_ticker;
