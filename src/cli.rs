// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_MANIFEST_NAME;
use crate::types::ReportFormat;

/// Command-line arguments for `affected`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "affected",
    version,
    about = "Select the projects of a multi-project build affected by a change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the build manifest (TOML). Its directory is the build root.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MANIFEST_NAME)]
    pub config: String,

    /// Baseline reference to diff against (overrides `[build].base`).
    #[arg(long, value_name = "REF")]
    pub base: Option<String>,

    /// Compare `--base` against this reference instead of the working tree.
    #[arg(long, value_name = "REF")]
    pub head: Option<String>,

    /// Use these changed files instead of asking git.
    ///
    /// Paths are relative to the build root; absolute paths inside the root
    /// are accepted too.
    #[arg(long, value_name = "PATH", num_args = 1..)]
    pub files: Option<Vec<String>>,

    /// Skip tasks of unaffected projects (overrides `[build].only_affected`).
    #[arg(long)]
    pub only_affected: bool,

    /// Output format for the report.
    #[arg(long, value_enum, value_name = "FORMAT", default_value = "text")]
    pub format: ReportFormat,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `AFFECTED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the project graph, but don't look at changes.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = CliArgs::try_parse_from(["affected"]).unwrap();
        assert_eq!(args.config, DEFAULT_MANIFEST_NAME);
        assert_eq!(args.format, ReportFormat::Text);
        assert!(args.files.is_none());
        assert!(!args.only_affected);
    }

    #[test]
    fn files_accept_several_values_and_repeats() {
        let args = CliArgs::try_parse_from([
            "affected",
            "--files",
            "app/a.kt",
            "number-utils/b.kt",
            "--files",
            "docs/a,b.md",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(
            args.files.unwrap(),
            vec!["app/a.kt", "number-utils/b.kt", "docs/a,b.md"]
        );
        assert_eq!(args.format, ReportFormat::Json);
    }
}
