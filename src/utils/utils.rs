use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::models::conversion::{ConversionOutcome, ConversionSummary, RunStatus};

pub fn setup_logging(log_level: &str) {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    // RUST_LOG can still refine individual modules
    let initialised = env_logger::Builder::new()
        .filter_level(log_level_filter)
        .parse_default_env()
        .try_init();
    if initialised.is_err() {
        log::debug!("Logger already initialised, keeping the existing one");
    }
}

pub struct ProgressManager {
    pb: ProgressBar,
    failed: AtomicU64,
    start: Instant,
}

impl ProgressManager {
    pub fn new(total: u64, no_progress: bool) -> Self {
        let pb = if no_progress || total == 0 {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} ETA: {eta_precise}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            pb.set_style(style);
            pb
        };
        ProgressManager {
            pb,
            failed: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    pub fn hidden() -> Self {
        Self::new(0, true)
    }

    pub fn start_file(&self, path: &Path) {
        self.pb.set_message(format!("Converting {}", file_label(path)));
    }

    pub fn record(&self, outcome: &ConversionOutcome) {
        if !outcome.is_success() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.pb.inc(1);
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn finish(&self, summary: &ConversionSummary) {
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 {
            summary.attempted() as f64 / elapsed
        } else {
            0.0
        };
        let msg = match summary.status() {
            RunStatus::NothingToConvert => "Nothing to convert".to_string(),
            RunStatus::Stopped => format!(
                "Stopped after {} of {} file(s), {} failed",
                summary.attempted(),
                summary.discovered(),
                self.failed()
            ),
            _ => format!(
                "Done, {} file(s), {} failed, {:.1} files/s",
                summary.attempted(),
                self.failed(),
                speed
            ),
        };
        self.pb.finish_with_message(msg);
    }
}

pub fn create_progress_bar(total: u64, no_progress: bool) -> ProgressManager {
    ProgressManager::new(total, no_progress)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string()
}
