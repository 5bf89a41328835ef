use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::config::config::FailurePolicy;
use crate::error::{ConversionError, DiscoveryError, Result};
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::{
    format_tag, ConversionInput, ConversionOutcome, ConversionSpec, ConversionSummary,
};
use crate::models::file::{FileDiscoveryInput, FileList};
use crate::service::codec::ImageCodecService;
use crate::service::discovery::WalkDirDiscoveryService;
use crate::service::traits::i_service::{DiscoveryServiceTrait, ImageServiceTrait};
use crate::utils::path::derive_path;
use crate::utils::utils::{create_progress_bar, ProgressManager};

pub struct ConversionFacade {
    discovery_service: Box<dyn DiscoveryServiceTrait>,
    image_service: Box<dyn ImageServiceTrait>,
}

impl ConversionFacade {
    pub fn new(
        discovery_service: Box<dyn DiscoveryServiceTrait>,
        image_service: Box<dyn ImageServiceTrait>,
    ) -> Self {
        ConversionFacade {
            discovery_service,
            image_service,
        }
    }

    pub fn discover(
        &self,
        input: &FileDiscoveryInput,
        spec: &ConversionSpec,
    ) -> std::result::Result<FileList, DiscoveryError> {
        self.discovery_service.discover(input, spec)
    }

    /// Converts a single file. Never fails: every error ends up in the outcome.
    pub fn convert_one(&self, source: &Path, spec: &ConversionSpec) -> ConversionOutcome {
        let output = derive_path(source, spec.target_extension());
        info!("Converting {}", source.display());

        let decoded = match self.image_service.decode(source) {
            Ok(decoded) => decoded,
            Err(e) => {
                error!("[{}] {}", e.stage(), e);
                return ConversionOutcome::failed(source.to_path_buf(), output, e);
            }
        };
        let source_format = decoded.format.map(format_tag);

        if let Err(e) = self
            .image_service
            .encode(&decoded.image, &output, spec.target_format())
        {
            error!("[{}] {}", e.stage(), e);
            return ConversionOutcome::failed(source.to_path_buf(), output, e);
        }

        info!(
            "Converted {} -> {} (from {})",
            source.display(),
            output.display(),
            source_format.as_deref().unwrap_or("unknown")
        );
        ConversionOutcome::succeeded(source.to_path_buf(), output, source_format)
    }

    // Converts `source` unless an earlier file already claimed its output
    fn convert_unclaimed(
        &self,
        source: &Path,
        claimed_by: Option<&PathBuf>,
        spec: &ConversionSpec,
    ) -> ConversionOutcome {
        let Some(owner) = claimed_by else {
            return self.convert_one(source, spec);
        };
        let output = derive_path(source, spec.target_extension());
        let e = ConversionError::Collision {
            path: output.clone(),
            claimed_by: owner.clone(),
        };
        error!("[{}] {}", e.stage(), e);
        ConversionOutcome::failed(source.to_path_buf(), output, e)
    }

    /// Converts every file in order, continuing past failures.
    pub fn convert_all(&self, files: &FileList, spec: &ConversionSpec) -> ConversionSummary {
        self.convert_batch(files, spec, FailurePolicy::Continue, &ProgressManager::hidden())
    }

    pub fn convert_batch(
        &self,
        files: &FileList,
        spec: &ConversionSpec,
        policy: FailurePolicy,
        progress: &ProgressManager,
    ) -> ConversionSummary {
        let claims = claimed_outputs(files, spec);
        let mut summary = ConversionSummary::new(files.len());
        for (source, claimed_by) in files.iter().zip(&claims) {
            progress.start_file(source);
            let outcome = self.convert_unclaimed(source, claimed_by.as_ref(), spec);
            progress.record(&outcome);
            let failed = !outcome.is_success();
            summary.record(outcome);
            if failed && policy == FailurePolicy::Stop {
                warn!(
                    "Stopping after the first failure, {} file(s) left unconverted",
                    summary.discovered() - summary.attempted()
                );
                break;
            }
        }
        summary
    }

    /// Converts every file on `pool`. Outcomes are folded in list order, so the
    /// summary is the same as a sequential `convert_all`.
    pub fn convert_all_parallel(
        &self,
        files: &FileList,
        spec: &ConversionSpec,
        pool: &ThreadPool,
        progress: &ProgressManager,
    ) -> ConversionSummary {
        let claims = claimed_outputs(files, spec);
        let outcomes: Vec<ConversionOutcome> = pool.install(|| {
            files
                .as_slice()
                .par_iter()
                .zip(claims.par_iter())
                .map(|(source, claimed_by)| {
                    progress.start_file(source);
                    let outcome = self.convert_unclaimed(source, claimed_by.as_ref(), spec);
                    progress.record(&outcome);
                    outcome
                })
                .collect()
        });
        ConversionSummary::from_outcomes(files.len(), outcomes)
    }

    fn build_pool(jobs: usize) -> Result<ThreadPool> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|index| format!("convert-{}", index))
            .build()?;
        Ok(pool)
    }
}

/// For each file, the earlier file in list order whose output it would
/// overwrite. Only possible when the source extension is matched ignoring case.
fn claimed_outputs(files: &FileList, spec: &ConversionSpec) -> Vec<Option<PathBuf>> {
    let mut owners: HashMap<PathBuf, &Path> = HashMap::new();
    files
        .iter()
        .map(|source| match owners.entry(derive_path(source, spec.target_extension())) {
            Entry::Occupied(owner) => Some(owner.get().to_path_buf()),
            Entry::Vacant(slot) => {
                slot.insert(source);
                None
            }
        })
        .collect()
}

impl Default for ConversionFacade {
    fn default() -> Self {
        Self::new(
            Box::new(WalkDirDiscoveryService),
            Box::new(ImageCodecService),
        )
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self, input: ConversionInput) -> Result<ConversionSummary> {
        let spec = &input.spec;
        info!(
            "Starting conversion, root: {}, {} -> {}",
            input.discovery.root.display(),
            spec.source_extension(),
            spec.target_extension()
        );

        let files = self.discover(&input.discovery, spec)?;
        if files.is_empty() {
            warn!(
                "No {} files found under {}",
                spec.source_extension(),
                input.discovery.root.display()
            );
            return Ok(ConversionSummary::new(0));
        }

        let progress = create_progress_bar(files.len() as u64, input.no_progress);
        let summary = match (input.jobs, input.failure_policy) {
            (1, policy) => self.convert_batch(&files, spec, policy, &progress),
            (_, FailurePolicy::Stop) => {
                warn!("--on-error stop converts sequentially, ignoring --jobs {}", input.jobs);
                self.convert_batch(&files, spec, FailurePolicy::Stop, &progress)
            }
            (jobs, FailurePolicy::Continue) => {
                let pool = Self::build_pool(jobs)?;
                info!("Converting on {} worker thread(s)", pool.current_num_threads());
                self.convert_all_parallel(&files, spec, &pool, &progress)
            }
        };
        progress.finish(&summary);

        info!(
            "Conversion finished: {} of {} file(s) converted",
            summary.succeeded(),
            summary.attempted()
        );
        Ok(summary)
    }
}
