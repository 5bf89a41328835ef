use crate::config::ports::{AppConfig, ConversionPort};
use crate::error::Result;
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{ConversionInput, ConversionSpec, ConversionSummary};
use crate::models::file::FileDiscoveryInput;

// Conversion adapter: turns an AppConfig into a pipeline run
pub struct ConversionAdapter {
    facade: Box<dyn ConversionFacadeTrait>,
}

impl ConversionAdapter {
    pub fn new(facade: Box<dyn ConversionFacadeTrait>) -> Self {
        ConversionAdapter { facade }
    }
}

impl Default for ConversionAdapter {
    fn default() -> Self {
        Self::new(Box::new(ConversionFacade::default()))
    }
}

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> Result<ConversionSummary> {
        let spec = ConversionSpec::with_match_policy(
            &config.source_ext,
            &config.target_ext,
            config.match_policy,
        )?;
        let input = ConversionInput {
            discovery: FileDiscoveryInput {
                root: config.input.into(),
                follow_links: config.follow_links,
            },
            spec,
            jobs: config.jobs,
            failure_policy: config.failure_policy,
            no_progress: config.no_progress,
        };
        self.facade.execute_conversion(input)
    }
}
