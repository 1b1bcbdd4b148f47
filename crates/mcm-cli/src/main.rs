//! Music collection manager CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use mcm_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use mcm_cli::commands::{
    describe_error, load_settings, run_add, run_check, run_fields, run_show, run_sort,
    run_toggle_active,
};
use mcm_cli::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("error: {}", describe_error(&error));
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    match &cli.command {
        Command::Fields => println!("{}", run_fields()),
        Command::Show(args) => println!("{}", run_show(args, &settings)?),
        Command::Check(args) => println!("{}", run_check(args, &settings)?.render()),
        Command::Add(args) => {
            let outcome = run_add(args, &settings)?;
            let verb = if outcome.saved { "Added" } else { "Would add" };
            println!(
                "{verb} {} songs ({} total) to {}",
                outcome.added,
                outcome.total,
                args.file.display()
            );
        }
        Command::ToggleActive(args) => {
            let active = run_toggle_active(args, &settings)?;
            let state = if active { "active" } else { "inactive" };
            println!("{} is now {state}", args.new_file_name);
        }
        Command::Sort(args) => {
            let rules = run_sort(args, &settings)?;
            let keys: Vec<String> = rules.iter().map(ToString::to_string).collect();
            println!("Sorted {} by {}", args.file.display(), keys.join(", "));
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
