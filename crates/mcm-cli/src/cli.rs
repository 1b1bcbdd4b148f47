//! CLI argument definitions for the music collection manager.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mcm_model::SortRule;

#[derive(Parser)]
#[command(
    name = "mcm",
    version,
    about = "Music collection manager - inspect and edit collection CSV files",
    long_about = "Inspect and edit music collection CSV files.\n\n\
                  Files must start with the exact collection header. Rows that cannot\n\
                  be read are skipped and reported by `mcm check`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Store settings file (JSON).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the collection fields.
    Fields,

    /// Print a collection.
    Show(ShowArgs),

    /// Decode a collection and report skipped rows.
    Check(FileArgs),

    /// Add header-less rows from another file and save.
    Add(AddArgs),

    /// Flip the active flag of one song and save.
    ToggleActive(ToggleArgs),

    /// Sort a collection and save it in that order.
    Sort(SortArgs),
}

#[derive(Args)]
pub struct FileArgs {
    /// Collection CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Collection CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sort column as FIELD or FIELD:asc|desc. Repeat to add keys; the last
    /// one given is the primary key.
    #[arg(long = "sort", value_name = "FIELD[:DIR]")]
    pub sort: Vec<SortRule>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Args)]
pub struct AddArgs {
    /// Collection CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// File with header-less rows to add.
    #[arg(long = "from", value_name = "BATCH")]
    pub from: PathBuf,

    /// Validate and report without saving.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Collection CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// `new_file_name` of the song to toggle.
    #[arg(value_name = "NEW_FILE_NAME")]
    pub new_file_name: String,
}

#[derive(Args)]
pub struct SortArgs {
    /// Collection CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sort column as FIELD or FIELD:asc|desc.
    #[arg(long = "sort", value_name = "FIELD[:DIR]", required = true)]
    pub sort: Vec<SortRule>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mcm_model::FieldKey;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_with_sort_keys() {
        let cli = Cli::try_parse_from([
            "mcm",
            "show",
            "music.csv",
            "--sort",
            "artist",
            "--sort",
            "date:desc",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(
            args.sort,
            vec![
                SortRule::ascending(FieldKey::Artist),
                SortRule::descending(FieldKey::Date)
            ]
        );
        assert_eq!(args.format, OutputFormatArg::Json);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        assert!(Cli::try_parse_from(["mcm", "show", "music.csv", "--sort", "bpm"]).is_err());
    }

    #[test]
    fn test_sort_requires_a_key() {
        assert!(Cli::try_parse_from(["mcm", "sort", "music.csv"]).is_err());
    }
}
