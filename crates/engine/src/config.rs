use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub reference: ReferenceConfig,
    pub candidates: CandidatesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Reference side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    pub file: String,
    /// Worksheet name for xlsx inputs. Ignored for csv.
    #[serde(default)]
    pub sheet: Option<String>,
    pub columns: ReferenceColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceColumns {
    pub ticker: String,
    pub company: String,
    pub date: String,
}

impl ReferenceColumns {
    pub fn names(&self) -> [&str; 3] {
        [self.ticker.as_str(), self.company.as_str(), self.date.as_str()]
    }
}

// ---------------------------------------------------------------------------
// Candidate side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CandidatesConfig {
    pub source: SourceKind,
    /// SQLite database path. Required when source = "sqlite".
    #[serde(default)]
    pub database: Option<String>,
    /// Meeting year filter for the sqlite source.
    #[serde(default)]
    pub year: Option<i32>,
    /// API base URL. Required when source = "api".
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Sqlite,
    Api,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Api => write!(f, "api"),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub workbook: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl JobConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: JobConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.reference.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "reference.file must not be empty".into(),
            ));
        }

        for name in self.reference.columns.names() {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "reference.columns entries must not be empty".into(),
                ));
            }
        }

        match self.candidates.source {
            SourceKind::Sqlite => {
                if self.candidates.database.is_none() {
                    return Err(ReconError::ConfigValidation(
                        "candidates.database is required for source = \"sqlite\"".into(),
                    ));
                }
                if self.candidates.year.is_none() {
                    return Err(ReconError::ConfigValidation(
                        "candidates.year is required for source = \"sqlite\"".into(),
                    ));
                }
            }
            SourceKind::Api => {
                if self.candidates.base_url.is_none() {
                    return Err(ReconError::ConfigValidation(
                        "candidates.base_url is required for source = \"api\"".into(),
                    ));
                }
            }
        }

        if self.candidates.page_size == 0 {
            return Err(ReconError::ConfigValidation(
                "candidates.page_size must be positive".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
