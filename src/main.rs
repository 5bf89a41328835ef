use std::process::ExitCode;

use image_convert::action::cli::{exit_code, process_args, report_summary};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match process_args(args) {
        Ok(summary) => {
            report_summary(&summary);
            exit_code(&summary)
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
