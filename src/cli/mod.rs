//! CLI module for campusdb
//!
//! Provides command-line interface for:
//! - start: Load datasets and enter serving loop
//! - query: One-shot query execution
//! - list: Print loaded datasets

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{list, open_catalog, query, run, run_command, serve, start, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_json, write_response};
