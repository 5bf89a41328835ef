use clap::Parser;
use std::process::ExitCode;

use crate::action::interactive::process_interactive_mode;
use crate::config::config::{validate_input_path, Cli};
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::error::Result;
use crate::facade::ports::facade_ports::ConversionAdapter;
use crate::models::conversion::{ConversionSummary, MatchPolicy, RunStatus};
use crate::service::config_service::ConfigService;
use crate::utils::utils::setup_logging;

pub fn process_args(args: Vec<String>) -> Result<ConversionSummary> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode(args)
    }
}

pub fn process_cli_mode(args: Vec<String>) -> Result<ConversionSummary> {
    let cli = Cli::parse_from(args);
    setup_logging(&cli.log_level);

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone())));
    let config = config_service.get_config()?;

    if cli.show_config {
        println!("Configuration in use: {:#?}", config);
    }

    let conversion_port: Box<dyn ConversionPort> = Box::new(ConversionAdapter::default());
    conversion_port.execute(config)
}

// CLI config adapter
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        validate_input_path(&self.cli.input)?;

        let match_policy = if self.cli.ignore_case {
            MatchPolicy::IgnoreAsciiCase
        } else {
            MatchPolicy::CaseSensitive
        };

        Ok(AppConfig {
            input: self.cli.input.clone(),
            source_ext: self.cli.source_ext.clone(),
            target_ext: self.cli.target_ext.clone(),
            match_policy,
            follow_links: self.cli.follow_links,
            jobs: self.cli.jobs,
            failure_policy: self.cli.on_error,
            no_progress: self.cli.no_progress,
        })
    }
}

/// Prints the human-readable report of a run.
pub fn report_summary(summary: &ConversionSummary) {
    for outcome in summary.failures() {
        if let Some(error) = outcome.error() {
            eprintln!("Failed [{}]: {}", error.stage(), error);
        }
    }
    match summary.status() {
        RunStatus::NothingToConvert => {
            println!("Nothing to convert: no matching files were found.");
        }
        RunStatus::Stopped => {
            println!(
                "Stopped after the first failure: {} of {} attempted file(s) converted, {} not attempted.",
                summary.succeeded(),
                summary.attempted(),
                summary.discovered() - summary.attempted()
            );
        }
        RunStatus::AllConverted | RunStatus::PartialFailure => {
            println!(
                "Conversion complete: {} of {} file(s) converted.",
                summary.succeeded(),
                summary.attempted()
            );
        }
    }
}

/// Success only when at least one file was attempted and every file converted.
pub fn exit_code(summary: &ConversionSummary) -> ExitCode {
    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
