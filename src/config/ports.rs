use crate::config::config::FailurePolicy;
use crate::error::Result;
use crate::models::conversion::{ConversionSummary, MatchPolicy};

// Application config, holds every parameter of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input: String,
    pub source_ext: String,
    pub target_ext: String,
    pub match_policy: MatchPolicy,
    pub follow_links: bool,
    pub jobs: usize,
    pub failure_policy: FailurePolicy,
    pub no_progress: bool,
}

// Port for config sources
pub trait ConfigPort {
    fn get_config(&self) -> Result<AppConfig>;
}

// Port for running the conversion
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> Result<ConversionSummary>;
}
