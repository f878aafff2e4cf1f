//! CLI argument definitions using clap
//!
//! Commands:
//! - campusdb start --config <path>
//! - campusdb query --config <path>
//! - campusdb list --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// campusdb - query engine for course sections and campus rooms
#[derive(Parser, Debug)]
#[command(name = "campusdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load datasets and serve JSON requests from stdin
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./campusdb.json")]
        config: PathBuf,
    },

    /// Execute a single query read from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./campusdb.json")]
        config: PathBuf,
    },

    /// Print the loaded datasets and exit
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./campusdb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["campusdb", "query"]).unwrap();
        match cli.command {
            Command::Query { config } => assert_eq!(config, PathBuf::from("./campusdb.json")),
            other => panic!("expected query, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::try_parse_from(["campusdb", "start", "--config", "/etc/campus.json"]).unwrap();
        assert!(matches!(cli.command, Command::Start { ref config } if config == &PathBuf::from("/etc/campus.json")));
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["campusdb", "explain"]).is_err());
    }
}
