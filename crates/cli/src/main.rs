// proxyrecon CLI - config-driven shareholder meeting date validation

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use proxyrecon_engine::config::SourceKind;
use proxyrecon_engine::{JobConfig, ReconReport};
use proxyrecon_fetch::{FetchError, ProposalClient};
use proxyrecon_io::{read_reference_csv, read_reference_xlsx, write_report, write_results_csv};
use proxyrecon_store::MeetingStore;

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_STRICT_MISMATCH, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "proxyrecon")]
#[command(about = "Validate expected shareholder meeting dates against recorded meetings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a validation job from a TOML config file
    #[command(after_help = "\
Examples:
  proxyrecon run job.toml
  proxyrecon run job.toml --json
  proxyrecon run job.toml --output report.json --strict")]
    Run {
        /// Path to the job config file
        config: PathBuf,

        /// Print the full JSON report to stdout instead of a human summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when large differences or not-found companies remain
        #[arg(long)]
        strict: bool,

        /// API token for source = "api" (falls back to the env var)
        #[arg(long, env = "PROXYRECON_API_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Parse and validate a job config without running it
    #[command(after_help = "\
Examples:
  proxyrecon validate job.toml")]
    Validate {
        /// Path to the job config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
            strict,
            token,
        } => cmd_run(config, json, output, strict, token),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

fn invalid_config(msg: impl Into<String>) -> CliError {
    CliError {
        code: EXIT_INVALID_CONFIG,
        message: msg.into(),
        hint: None,
    }
}

fn runtime(msg: impl Into<String>) -> CliError {
    CliError {
        code: EXIT_RUNTIME,
        message: msg.into(),
        hint: None,
    }
}

// ── run ──

fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
    token: Option<String>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| runtime(format!("cannot read config: {e}")))?;
    let config = JobConfig::from_toml(&config_str).map_err(|e| invalid_config(e.to_string()))?;

    // Paths in the config resolve relative to the config file.
    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let (references, skipped) = load_references(&base_dir, &config)?;
    let candidates = load_candidates(&base_dir, &config, token)?;

    let report = proxyrecon_engine::run(&references, candidates);

    if let Some(ref workbook) = config.output.workbook {
        write_report(&base_dir.join(workbook), &report).map_err(|e| runtime(e.to_string()))?;
    }
    if let Some(ref csv) = config.output.csv {
        write_results_csv(&base_dir.join(csv), &report.results)
            .map_err(|e| runtime(e.to_string()))?;
    }

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| runtime(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| runtime(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    eprintln!("{}", human_summary(&config.name, &report, skipped));

    if strict && (report.summary.mismatched > 0 || report.summary.not_found > 0) {
        return Err(CliError {
            code: EXIT_STRICT_MISMATCH,
            message: format!(
                "strict: {} large differences, {} not found",
                report.summary.mismatched, report.summary.not_found
            ),
            hint: None,
        });
    }

    Ok(())
}

fn load_references(
    base_dir: &Path,
    config: &JobConfig,
) -> Result<(Vec<proxyrecon_engine::ReferenceRecord>, usize), CliError> {
    let path = base_dir.join(&config.reference.file);
    let columns = &config.reference.columns;

    let result = if is_excel(&path) {
        read_reference_xlsx(&path, config.reference.sheet.as_deref(), columns)
    } else {
        read_reference_csv(&path, columns)
    };
    result.map_err(|e| runtime(format!("{}: {e}", path.display())))
}

fn load_candidates(
    base_dir: &Path,
    config: &JobConfig,
    token: Option<String>,
) -> Result<Vec<proxyrecon_engine::CandidateRecord>, CliError> {
    match config.candidates.source {
        SourceKind::Sqlite => {
            // validate() guarantees database and year are present.
            let database = config.candidates.database.as_deref().unwrap_or_default();
            let year = config.candidates.year.unwrap_or_default();
            let store = MeetingStore::open(&base_dir.join(database))
                .map_err(|e| runtime(e.to_string()))?;
            store.fetch_candidates(year).map_err(|e| runtime(e.to_string()))
        }
        SourceKind::Api => {
            let base_url = config.candidates.base_url.as_deref().unwrap_or_default();
            let token = resolve_token(token)?;
            let client = ProposalClient::new(base_url, &token, config.candidates.page_size)
                .map_err(|e| runtime(e.to_string()))?;
            client.fetch_all().map_err(fetch_error)
        }
    }
}

/// Token comes from `--token`, falling back to `PROXYRECON_API_TOKEN`
/// (clap merges the two). Never read from the config file.
fn resolve_token(token: Option<String>) -> Result<String, CliError> {
    match token.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(CliError {
            code: EXIT_USAGE,
            message: "missing API token".into(),
            hint: Some("pass --token or set PROXYRECON_API_TOKEN".into()),
        }),
    }
}

fn fetch_error(e: FetchError) -> CliError {
    let hint = match e {
        FetchError::Auth { .. } => Some("check --token / PROXYRECON_API_TOKEN".into()),
        _ => None,
    };
    CliError {
        code: EXIT_RUNTIME,
        message: e.to_string(),
        hint,
    }
}

fn is_excel(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods")
    )
}

fn human_summary(name: &str, report: &ReconReport, skipped: usize) -> String {
    let s = &report.summary;
    let mut line = format!(
        "{name}: {} companies — {} validated, {} large differences, {} not found, {} without dates",
        s.total, s.validated, s.mismatched, s.not_found, s.no_date
    );
    if skipped > 0 {
        line.push_str(&format!(" ({skipped} reference rows skipped)"));
    }
    line
}

// ── validate ──

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| runtime(format!("cannot read config: {e}")))?;
    let config = JobConfig::from_toml(&config_str).map_err(|e| invalid_config(e.to_string()))?;
    eprintln!(
        "config OK: {} ({} source)",
        config.name, config.candidates.source
    );
    Ok(())
}
