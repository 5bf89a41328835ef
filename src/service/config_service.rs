use crate::config::config::{validate_input_path, FailurePolicy};
use crate::config::ports::{AppConfig, ConfigPort};
use crate::error::Result;
use crate::models::conversion::MatchPolicy;

pub const DEFAULT_SOURCE_EXT: &str = ".jpg";
pub const DEFAULT_TARGET_EXT: &str = ".png";

// Config service, picks the config adapter to read from
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> Result<AppConfig> {
        self.config_port.get_config()
    }
}

// Default config adapter: .jpg to .png, sequential, continue on failure
pub struct DefaultConfigAdapter {
    input: String,
}

impl DefaultConfigAdapter {
    pub fn new(input: String) -> Self {
        DefaultConfigAdapter { input }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        validate_input_path(&self.input)?;
        Ok(AppConfig {
            input: self.input.clone(),
            source_ext: DEFAULT_SOURCE_EXT.to_string(),
            target_ext: DEFAULT_TARGET_EXT.to_string(),
            match_policy: MatchPolicy::CaseSensitive,
            follow_links: false,
            jobs: 1,
            failure_policy: FailurePolicy::Continue,
            no_progress: false,
        })
    }
}
