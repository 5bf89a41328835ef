use dialoguer::{Confirm, Input};
use std::path::Path;

use crate::config::config::FailurePolicy;
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::error::Result;
use crate::facade::ports::facade_ports::ConversionAdapter;
use crate::models::conversion::{ConversionSpec, ConversionSummary, MatchPolicy};
use crate::service::config_service::{
    ConfigService, DefaultConfigAdapter, DEFAULT_SOURCE_EXT, DEFAULT_TARGET_EXT,
};
use crate::utils::utils::setup_logging;

pub fn process_interactive_mode() -> Result<ConversionSummary> {
    println!("=== Interactive mode ===");
    setup_logging("info");

    let input = get_input_path()?;
    let use_defaults = Confirm::new()
        .with_prompt(format!(
            "Convert {} files to {} with default settings?",
            DEFAULT_SOURCE_EXT, DEFAULT_TARGET_EXT
        ))
        .default(true)
        .interact()?;

    let config = if use_defaults {
        ConfigService::new(Box::new(DefaultConfigAdapter::new(input))).get_config()?
    } else {
        ConfigService::new(Box::new(InteractiveConfigAdapter::new(input))).get_config()?
    };

    ConversionAdapter::default().execute(config)
}

pub fn get_input_path() -> Result<String> {
    let input = Input::new()
        .with_prompt("Directory to convert (e.g. ./photos)")
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if Path::new(input).is_dir() {
                Ok(())
            } else {
                Err(format!("'{}' is not a directory", input))
            }
        })
        .interact_text()?;
    Ok(input)
}

// Interactive config adapter, asks for every setting
pub struct InteractiveConfigAdapter {
    input: String,
}

impl InteractiveConfigAdapter {
    pub fn new(input: String) -> Self {
        InteractiveConfigAdapter { input }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> Result<AppConfig> {
        let (source_ext, target_ext, match_policy) = get_extension_pair()?;
        let follow_links = Confirm::new()
            .with_prompt("Follow symbolic links?")
            .default(false)
            .interact()?;
        let failure_policy = if Confirm::new()
            .with_prompt("Stop at the first file that fails?")
            .default(false)
            .interact()?
        {
            FailurePolicy::Stop
        } else {
            FailurePolicy::Continue
        };

        Ok(AppConfig {
            input: self.input.clone(),
            source_ext,
            target_ext,
            match_policy,
            follow_links,
            jobs: 1,
            failure_policy,
            no_progress: false,
        })
    }
}

pub fn get_extension_pair() -> Result<(String, String, MatchPolicy)> {
    let source_ext: String = Input::new()
        .with_prompt("Source extension")
        .default(DEFAULT_SOURCE_EXT.to_string())
        .interact_text()?;
    let match_policy = if Confirm::new()
        .with_prompt("Ignore case when matching the source extension?")
        .default(false)
        .interact()?
    {
        MatchPolicy::IgnoreAsciiCase
    } else {
        MatchPolicy::CaseSensitive
    };
    let source_for_check = source_ext.clone();
    let target_ext: String = Input::new()
        .with_prompt("Target extension")
        .default(DEFAULT_TARGET_EXT.to_string())
        .validate_with(move |target: &String| -> std::result::Result<(), String> {
            ConversionSpec::with_match_policy(&source_for_check, target, match_policy)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok((source_ext, target_ext, match_policy))
}
