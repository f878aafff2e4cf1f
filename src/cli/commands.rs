//! CLI command implementations
//!
//! Every command follows the same boot sequence:
//!
//! 1. Load and validate the config file
//! 2. Load every snapshot in `data_dir` into a catalog
//! 3. Run the command against the catalog

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiHandler;
use crate::catalog::DatasetCatalog;
use crate::engine::QueryEngine;
use crate::executor::RESULT_LIMIT;
use crate::observability::{log_event_with_fields, Event};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_requests, stdout, write_error, write_json, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `*.json` dataset snapshots (required)
    pub data_dir: String,

    /// Maximum rows a query may return (optional, default 5000)
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Log QUERY_* events (optional, default true)
    #[serde(default = "default_log_queries")]
    pub log_queries: bool,
}

fn default_result_limit() -> usize {
    RESULT_LIMIT
}
fn default_log_queries() -> bool {
    true
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        let limit = config.result_limit.to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("data_dir", &config.data_dir), ("result_limit", &limit)],
        );

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.result_limit == 0 || self.result_limit > RESULT_LIMIT {
            return Err(CliError::config_error(format!(
                "Invalid result_limit: {}. Must be between 1 and {}.",
                self.result_limit, RESULT_LIMIT
            )));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config } => start(&config),
        Command::Query { config } => query(&config),
        Command::List { config } => list(&config),
    }
}

/// Load datasets, then answer request lines from stdin until EOF
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let mut catalog = open_catalog(&config)?;

    let stdin = io::stdin();
    let mut out = stdout();
    let mut handler = ApiHandler::new(&mut catalog).with_snapshot_dir(config.data_path());

    log_event_with_fields(Event::Serving, &[("data_dir", &config.data_dir)]);
    let served = serve(&mut handler, stdin.lock(), &mut out)?;

    log_event_with_fields(Event::ShutdownComplete, &[("requests", &served.to_string())]);
    Ok(())
}

/// Execute a single query and exit
///
/// The input line is either a bare query document or a full request
/// object with an `op` field.
pub fn query(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let mut catalog = open_catalog(&config)?;

    let stdin = io::stdin();
    let line = read_request(&mut stdin.lock())?;
    let request = as_query_request(&line)?;

    let mut handler = ApiHandler::new(&mut catalog);
    let response = handler.handle(&request);
    write_json(&mut stdout(), &response.to_json())
}

/// Print the dataset list and exit
pub fn list(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let catalog = open_catalog(&config)?;

    let data = serde_json::to_value(catalog.list_datasets())?;
    write_response(&mut stdout(), data)
}

/// Build a catalog from the config and load `data_dir` into it
pub fn open_catalog(config: &Config) -> CliResult<DatasetCatalog> {
    let data_dir = config.data_path();
    if !data_dir.is_dir() {
        return Err(CliError::boot_failed(format!(
            "data_dir is not a directory: {}",
            data_dir.display()
        )));
    }

    let engine = QueryEngine::with_result_limit(config.result_limit);
    let mut catalog = DatasetCatalog::with_engine(engine).with_query_logging(config.log_queries);
    catalog.load_dir(data_dir)?;
    Ok(catalog)
}

/// Serving loop. Returns the number of requests answered.
///
/// A read failure ends the loop after reporting it on `out`.
pub fn serve<R: BufRead, W: Write>(
    handler: &mut ApiHandler<'_>,
    input: R,
    out: &mut W,
) -> CliResult<usize> {
    let mut served = 0;
    for line in read_requests(input) {
        match line {
            Ok(line) => {
                let response = handler.handle(&line);
                write_json(out, &response.to_json())?;
                served += 1;
            }
            Err(e) => {
                write_error(out, e.code_str(), e.message())?;
                return Err(e);
            }
        }
    }
    Ok(served)
}

/// Wraps a bare query document as `{"op": "query", "query": ...}`
fn as_query_request(line: &str) -> CliResult<String> {
    let value: Value = serde_json::from_str(line)?;
    let is_request = value.as_object().map_or(false, |o| o.contains_key("op"));
    if is_request {
        Ok(line.to_string())
    } else {
        Ok(json!({"op": "query", "query": value}).to_string())
    }
}
