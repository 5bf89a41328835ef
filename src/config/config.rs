use clap::{Parser, ValueEnum};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Parser, Clone, Debug)]
#[command(
    name = "image_convert",
    about = "Batch-convert images under a directory to another format",
    long_about = "Recursively finds every file with the source extension under INPUT, decodes it by content and writes it next to the original with the target extension.\nA file that cannot be converted is reported and skipped; the run continues with the rest unless `--on-error stop` is given.\nRun without arguments for interactive mode.",
    arg_required_else_help = true
)]
pub struct Cli {
    pub input: String,
    #[arg(short, long, default_value = ".jpg")]
    pub source_ext: String,
    #[arg(short, long, default_value = ".png")]
    pub target_ext: String,
    #[arg(long, default_value_t = false)]
    pub ignore_case: bool,
    #[arg(long, default_value_t = false)]
    pub follow_links: bool,
    /// Worker threads; 1 converts sequentially, 0 uses every core
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
    #[arg(long, value_enum, default_value = "continue")]
    pub on_error: FailurePolicy,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

/// What a batch does after a file fails to convert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Record the failure and keep converting the remaining files
    #[default]
    Continue,
    /// Stop at the first failure
    Stop,
}

pub fn validate_input_path(input: &str) -> Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("Input path does not exist: {}", input);
        return Err(Error::InvalidRoot {
            path: path.to_path_buf(),
            reason: "path does not exist".to_string(),
        });
    }
    if !path.is_dir() {
        log::error!("Input path is not a directory: {}", input);
        return Err(Error::InvalidRoot {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(path)
}
