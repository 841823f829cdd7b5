//! Command-line interface parsing for the winter temperature tracker
//!
//! This module handles parsing of CLI arguments using clap: `serve` runs the
//! HTTP API, `view` opens the terminal viewer against a running server and
//! `report` prints the payload once.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::Config;
use crate::winter;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The requested winter has no table entry
    #[error("Invalid year: '{0}'. Winters from {1} to {2} are available")]
    InvalidYear(i32, i32, i32),
}

/// Winter temperature tracker - compare meteorological and astronomical winters
#[derive(Parser, Debug)]
#[command(name = "wintertemp")]
#[command(about = "Compare meteorological and astronomical winter temperatures")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the temperature API
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Open the terminal viewer
    ///
    /// Examples:
    ///   wintertemp view                          # Viewer against the local server
    ///   wintertemp view --year 2019              # Focus the 2018-2019 winter
    ///   wintertemp view --url http://host:3000   # Viewer against another server
    View {
        /// Base URL of a running `wintertemp serve`
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// Winter to focus, labelled by the year it ends in
        #[arg(long, value_name = "YEAR")]
        year: Option<i32>,
    },
    /// Aggregate once and print the payload as JSON
    Report,
}

/// Configuration derived from CLI arguments for viewer startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Focus winter (latest started winter if not specified)
    pub focus_year: Option<i32>,
    pub warm_label: String,
    pub cold_label: String,
}

/// Validates a `--year` argument against the winter table
pub fn parse_year_arg(year: i32) -> Result<i32, CliError> {
    let first = winter::table_years().next().unwrap_or(year);
    let last = winter::table_years().last().unwrap_or(year);
    if (first..=last).contains(&year) {
        Ok(year)
    } else {
        Err(CliError::InvalidYear(year, first, last))
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from the `view` arguments and the environment
    pub fn from_args(year: Option<i32>, config: &Config) -> Result<Self, CliError> {
        Ok(StartupConfig {
            focus_year: year.map(parse_year_arg).transpose()?,
            warm_label: config.warm_label.clone(),
            cold_label: config.cold_label.clone(),
        })
    }
}

/// Default viewer URL for a configured bind address
pub fn default_view_url(config: &Config) -> String {
    format!("http://{}", config.bind_addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_parse_year_arg_accepts_table_years() {
        assert_eq!(parse_year_arg(2001).unwrap(), 2001);
        assert_eq!(parse_year_arg(2025).unwrap(), 2025);
    }

    #[test]
    fn test_parse_year_arg_invalid() {
        let err = parse_year_arg(1999).unwrap_err();
        assert!(err.to_string().contains("Invalid year"));
        assert!(err.to_string().contains("1999"));
        assert!(parse_year_arg(2026).is_err());
    }

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["wintertemp", "serve"]);
        assert_eq!(cli.command, Command::Serve { bind: None });

        let cli = Cli::parse_from(["wintertemp", "serve", "--bind", "0.0.0.0:8080"]);
        assert_eq!(
            cli.command,
            Command::Serve {
                bind: Some("0.0.0.0:8080".parse().unwrap())
            }
        );
    }

    #[test]
    fn test_cli_parse_view() {
        let cli = Cli::parse_from(["wintertemp", "view", "--year", "2019"]);
        assert_eq!(
            cli.command,
            Command::View {
                url: None,
                year: Some(2019)
            }
        );
    }

    #[test]
    fn test_cli_parse_report() {
        let cli = Cli::parse_from(["wintertemp", "report"]);
        assert_eq!(cli.command, Command::Report);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["wintertemp"]).is_err());
    }

    #[test]
    fn test_startup_config_from_args() {
        let startup = StartupConfig::from_args(Some(2024), &config()).unwrap();
        assert_eq!(startup.focus_year, Some(2024));
        assert_eq!(startup.warm_label, "neomonk");
        assert_eq!(startup.cold_label, "pajaro");

        let startup = StartupConfig::from_args(None, &config()).unwrap();
        assert!(startup.focus_year.is_none());
    }

    #[test]
    fn test_startup_config_from_args_invalid_year() {
        assert!(StartupConfig::from_args(Some(1990), &config()).is_err());
    }

    #[test]
    fn test_default_view_url() {
        assert_eq!(default_view_url(&config()), "http://127.0.0.1:3000");
    }
}
