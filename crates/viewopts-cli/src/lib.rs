//! Shared CLI definitions for viewopts.
//!
//! Kept separate from the library so the argument surface can be reused by
//! other front ends without pulling in the controller.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Data source whose attribute catalog should be consulted
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum DataSourceArg {
    /// Log records
    #[default]
    Logs,
    /// Distributed traces
    Traces,
    /// Metric series
    Metrics,
}

/// How rows are rendered in the view
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Unformatted raw record body
    Raw,
    /// One record per entry with the selected attributes inline
    List,
    /// One row per record, one column per selected attribute
    Table,
}

/// Log output format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum LogFormatArg {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Command-line arguments for viewopts
#[derive(Clone, Parser, Debug)]
#[command(
    name = "viewopts",
    version,
    about = "Resolve and edit the display options carried in a shareable view URL"
)]
pub struct Args {
    /// JSON file holding the attribute catalog (same shape as the attribute-keys API response)
    #[arg(long = "catalog", value_name = "FILE", required_unless_present = "generate_config")]
    pub catalog: Option<PathBuf>,

    /// Data source the catalog belongs to (overrides config [catalog] data_source)
    #[arg(long = "data-source", value_enum)]
    pub data_source: Option<DataSourceArg>,

    /// Aggregate operator used when fetching attribute suggestions (overrides config)
    #[arg(long = "aggregate-operator", value_name = "OP")]
    pub aggregate_operator: Option<String>,

    /// Current location query string, e.g. "q=error&options=%7B...%7D"
    #[arg(long = "query", value_name = "QS", default_value = "")]
    pub query: String,

    /// Base URL used when printing the shareable link
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Initial column seed (identifier or attribute name); repeat for several columns
    #[arg(long = "column", value_name = "COL")]
    pub columns: Vec<String>,

    /// Add columns to the current selection; repeatable (resets format and max lines to their defaults)
    #[arg(long = "add", value_name = "ID")]
    pub add: Vec<String>,

    /// Remove a column from the current selection (resets format and max lines to their defaults)
    #[arg(long = "remove", value_name = "ID")]
    pub remove: Option<String>,

    /// Change the row format (resets other options to their defaults)
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,

    /// Change the number of lines rendered per row (resets other options to their defaults)
    #[arg(long = "max-lines", value_name = "N", conflicts_with = "unlimited_lines")]
    pub max_lines: Option<u32>,

    /// Render every line of each row
    #[arg(long = "unlimited-lines", action)]
    pub unlimited_lines: bool,

    /// Print the resolved options and menu state as JSON instead of the link
    #[arg(long = "json", action)]
    pub json: bool,

    /// Log output format
    #[arg(long = "log-format", value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Write a commented default configuration file and exit
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Overwrite an existing configuration file when used with --generate-config
    #[arg(long = "force", action, requires = "generate_config")]
    pub force: bool,
}
