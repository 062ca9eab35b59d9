use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ReporterConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "testrun-report",
    version,
    about = "Render test-run results into a single interactive HTML report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: testrun-report.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay an NDJSON event log and write a report
    Render {
        /// Event log, one JSON event per line
        #[arg(long)]
        events: String,

        /// Output format: html, junit, json, console
        #[arg(long, default_value = "html")]
        format: String,

        /// Directory for report.html (overrides config `report_dir`)
        #[arg(long)]
        output_dir: Option<String>,

        /// Output file path (default: <report_dir>/report.html for html, stdout for others)
        #[arg(short, long)]
        output: Option<String>,

        /// Report title (overrides config `title`)
        #[arg(long)]
        title: Option<String>,
    },

    /// Print a terminal summary of an event log
    Summary {
        /// Event log, one JSON event per line
        #[arg(long)]
        events: String,
    },
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(
    mut config: ReporterConfig,
    output_dir: Option<&str>,
    title: Option<&str>,
) -> ReporterConfig {
    if let Some(dir) = output_dir {
        config.report_dir = PathBuf::from(dir);
    }
    if let Some(title) = title {
        config.title = title.to_string();
    }
    config
}
