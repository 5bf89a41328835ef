use std::io;
use std::path::{Path, PathBuf};

use image::ImageError;
use thiserror::Error;

use crate::models::conversion::ConversionStage;

pub type Result<T, E = Error> = std::result::Result<T, E>;

// Top-level error: raised before conversion starts or when discovery fails
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("invalid root directory '{}': {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Rejected `(source, target)` extension pair.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("extension '{0}' must start with '.'")]
    MissingDot(String),
    #[error("extension '{0}' has nothing after the '.'")]
    EmptyExtension(String),
    #[error("extension '{0}' may not contain another '.' or a path separator")]
    InvalidCharacter(String),
    #[error("no encoder is available for target extension '{0}'")]
    UnsupportedTarget(String),
    #[error("source and target extension are both '{0}', output would overwrite the source")]
    SameExtension(String),
}

/// The directory walk failed. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

// Per-file failure, only ever recorded in that file's outcome
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("open failed for '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("decode failed for '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        format: Option<String>,
        #[source]
        source: ImageError,
    },
    #[error("create failed for '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encode failed for '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("output '{}' is already written by '{}'", path.display(), claimed_by.display())]
    Collision { path: PathBuf, claimed_by: PathBuf },
}

impl ConversionError {
    pub fn stage(&self) -> ConversionStage {
        match self {
            Self::Open { .. } => ConversionStage::Open,
            Self::Decode { .. } => ConversionStage::Decode,
            Self::Create { .. } => ConversionStage::Create,
            Self::Encode { .. } => ConversionStage::Encode,
            Self::Collision { .. } => ConversionStage::Collision,
        }
    }

    /// Path the failing stage was operating on: the source for open/decode,
    /// the output for create/encode/collision.
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. }
            | Self::Decode { path, .. }
            | Self::Create { path, .. }
            | Self::Encode { path, .. }
            | Self::Collision { path, .. } => path,
        }
    }

    /// Format the decoder recognised before failing, if any.
    pub fn detected_format(&self) -> Option<&str> {
        match self {
            Self::Decode { format, .. } => format.as_deref(),
            _ => None,
        }
    }
}
