use thiserror::Error;

/// Errors from configuration and file-level collaborators.
///
/// The engine itself is total: bad tickers and bad dates are statuses,
/// not errors. Everything here happens before records reach it.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("worksheet error: {0}")]
    Sheet(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ReconError {
    fn from(e: std::io::Error) -> Self {
        ReconError::Io(e.to_string())
    }
}
