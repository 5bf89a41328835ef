use std::fmt;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::config::config::FailurePolicy;
use crate::error::{ConversionError, SpecError};
use crate::models::file::FileDiscoveryInput;
use crate::utils::path::extension_of;

/// How the source extension is compared against file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    #[default]
    CaseSensitive,
    IgnoreAsciiCase,
}

impl MatchPolicy {
    pub fn extensions_equal(&self, left: &str, right: &str) -> bool {
        match self {
            Self::CaseSensitive => left == right,
            Self::IgnoreAsciiCase => left.eq_ignore_ascii_case(right),
        }
    }
}

/// The `(source, target)` extension pair of one run.
///
/// Both extensions start with `.` and carry no further dot, so they can be
/// compared directly with the last-dot suffix of a file name. The target
/// extension resolves to an [`ImageFormat`] the `image` crate can encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSpec {
    source_extension: String,
    target_extension: String,
    target_format: ImageFormat,
    match_policy: MatchPolicy,
}

impl ConversionSpec {
    pub fn new(source_extension: &str, target_extension: &str) -> Result<Self, SpecError> {
        Self::with_match_policy(source_extension, target_extension, MatchPolicy::default())
    }

    pub fn with_match_policy(
        source_extension: &str,
        target_extension: &str,
        match_policy: MatchPolicy,
    ) -> Result<Self, SpecError> {
        validate_extension(source_extension)?;
        validate_extension(target_extension)?;
        // Case-insensitive filesystems would resolve ".PNG" -> ".png" to the source
        if source_extension.eq_ignore_ascii_case(target_extension) {
            return Err(SpecError::SameExtension(source_extension.to_string()));
        }
        let target_format = ImageFormat::from_extension(&target_extension[1..])
            .filter(|format| format.writing_enabled())
            .ok_or_else(|| SpecError::UnsupportedTarget(target_extension.to_string()))?;

        Ok(ConversionSpec {
            source_extension: source_extension.to_string(),
            target_extension: target_extension.to_string(),
            target_format,
            match_policy,
        })
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn target_extension(&self) -> &str {
        &self.target_extension
    }

    pub fn target_format(&self) -> ImageFormat {
        self.target_format
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    /// Whether a base name carries the source extension.
    pub fn matches_name(&self, name: &str) -> bool {
        extension_of(name)
            .map(|extension| self.match_policy.extensions_equal(extension, &self.source_extension))
            .unwrap_or(false)
    }

    /// Whether a path's base name carries the source extension. Names that
    /// are not valid UTF-8 never match.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.matches_name(name))
            .unwrap_or(false)
    }
}

fn validate_extension(extension: &str) -> Result<(), SpecError> {
    let Some(suffix) = extension.strip_prefix('.') else {
        return Err(SpecError::MissingDot(extension.to_string()));
    };
    if suffix.is_empty() {
        return Err(SpecError::EmptyExtension(extension.to_string()));
    }
    if suffix.contains(['.', '/', '\\']) {
        return Err(SpecError::InvalidCharacter(extension.to_string()));
    }
    Ok(())
}

/// Lower-cased name of a decoder format, e.g. `jpeg`.
pub fn format_tag(format: ImageFormat) -> String {
    format!("{:?}", format).to_ascii_lowercase()
}

/// Step of a single file conversion that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    Open,
    Decode,
    Create,
    Encode,
    /// Another source earlier in the run already claimed the same output
    Collision,
}

impl fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Open => "open",
            Self::Decode => "decode",
            Self::Create => "create",
            Self::Encode => "encode",
            Self::Collision => "collision",
        };
        f.write_str(tag)
    }
}

/// Result of converting one file.
#[derive(Debug)]
pub struct ConversionOutcome {
    source: PathBuf,
    output: PathBuf,
    source_format: Option<String>,
    error: Option<ConversionError>,
}

impl ConversionOutcome {
    pub fn succeeded(source: PathBuf, output: PathBuf, source_format: Option<String>) -> Self {
        ConversionOutcome {
            source,
            output,
            source_format,
            error: None,
        }
    }

    pub fn failed(source: PathBuf, output: PathBuf, error: ConversionError) -> Self {
        let source_format = error.detected_format().map(str::to_owned);
        ConversionOutcome {
            source,
            output,
            source_format,
            error: Some(error),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn source_format(&self) -> Option<&str> {
        self.source_format.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&ConversionError> {
        self.error.as_ref()
    }

    pub fn stage(&self) -> Option<ConversionStage> {
        self.error.as_ref().map(ConversionError::stage)
    }
}

/// Overall state of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No file matched the source extension
    NothingToConvert,
    AllConverted,
    PartialFailure,
    /// The stop policy halted the run before every file was attempted
    Stopped,
}

// Aggregate of a run; invariant: succeeded <= attempted <= discovered
#[derive(Debug, Default)]
pub struct ConversionSummary {
    discovered: usize,
    attempted: usize,
    succeeded: usize,
    failures: Vec<ConversionOutcome>,
}

impl ConversionSummary {
    pub fn new(discovered: usize) -> Self {
        ConversionSummary {
            discovered,
            ..Default::default()
        }
    }

    pub fn from_outcomes<I>(discovered: usize, outcomes: I) -> Self
    where
        I: IntoIterator<Item = ConversionOutcome>,
    {
        let mut summary = Self::new(discovered);
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: ConversionOutcome) {
        debug_assert!(self.attempted < self.discovered);
        self.attempted += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failures.push(outcome);
        }
    }

    pub fn discovered(&self) -> usize {
        self.discovered
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    pub fn failures(&self) -> &[ConversionOutcome] {
        &self.failures
    }

    pub fn status(&self) -> RunStatus {
        if self.discovered == 0 {
            RunStatus::NothingToConvert
        } else if self.attempted < self.discovered {
            RunStatus::Stopped
        } else if self.succeeded == self.attempted {
            RunStatus::AllConverted
        } else {
            RunStatus::PartialFailure
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == RunStatus::AllConverted
    }
}

// Everything one pipeline run needs, passed in explicitly
#[derive(Debug, Clone)]
pub struct ConversionInput {
    pub discovery: FileDiscoveryInput,
    pub spec: ConversionSpec,
    pub jobs: usize,
    pub failure_policy: FailurePolicy,
    pub no_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn open_failure(path: &str) -> ConversionOutcome {
        let error = ConversionError::Open {
            path: PathBuf::from(path),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        ConversionOutcome::failed(PathBuf::from(path), PathBuf::from("out.png"), error)
    }

    fn success(path: &str) -> ConversionOutcome {
        ConversionOutcome::succeeded(
            PathBuf::from(path),
            PathBuf::from("out.png"),
            Some("jpeg".to_string()),
        )
    }

    #[test]
    fn spec_accepts_valid_pair() {
        let spec = ConversionSpec::new(".jpg", ".png").unwrap();
        assert_eq!(spec.source_extension(), ".jpg");
        assert_eq!(spec.target_extension(), ".png");
        assert_eq!(spec.target_format(), ImageFormat::Png);
        assert_eq!(spec.match_policy(), MatchPolicy::CaseSensitive);
    }

    #[test]
    fn spec_rejects_malformed_extensions() {
        assert_eq!(
            ConversionSpec::new("jpg", ".png"),
            Err(SpecError::MissingDot("jpg".to_string()))
        );
        assert_eq!(
            ConversionSpec::new(".jpg", "."),
            Err(SpecError::EmptyExtension(".".to_string()))
        );
        assert_eq!(
            ConversionSpec::new(".tar.gz", ".png"),
            Err(SpecError::InvalidCharacter(".tar.gz".to_string()))
        );
        assert_eq!(
            ConversionSpec::new(".jpg", "./png"),
            Err(SpecError::InvalidCharacter("./png".to_string()))
        );
    }

    #[test]
    fn spec_rejects_unknown_target_format() {
        assert_eq!(
            ConversionSpec::new(".jpg", ".docx"),
            Err(SpecError::UnsupportedTarget(".docx".to_string()))
        );
    }

    #[test]
    fn spec_rejects_overwriting_the_source() {
        assert_eq!(
            ConversionSpec::new(".png", ".png"),
            Err(SpecError::SameExtension(".png".to_string()))
        );
        assert_eq!(
            ConversionSpec::new(".PNG", ".png"),
            Err(SpecError::SameExtension(".PNG".to_string()))
        );
        assert_eq!(
            ConversionSpec::with_match_policy(".PNG", ".png", MatchPolicy::IgnoreAsciiCase),
            Err(SpecError::SameExtension(".PNG".to_string()))
        );
    }

    #[test]
    fn matching_follows_policy() {
        let strict = ConversionSpec::new(".jpg", ".png").unwrap();
        assert!(strict.matches(Path::new("dir/a.jpg")));
        assert!(!strict.matches(Path::new("dir/a.JPG")));
        assert!(!strict.matches(Path::new("dir/a.jpeg")));
        assert!(!strict.matches(Path::new("dir/a.jpg.bak")));
        assert!(!strict.matches(Path::new("dir/jpg")));

        let relaxed =
            ConversionSpec::with_match_policy(".jpg", ".png", MatchPolicy::IgnoreAsciiCase).unwrap();
        assert!(relaxed.matches(Path::new("dir/a.JPG")));
        assert!(relaxed.matches(Path::new("dir/a.Jpg")));
    }

    #[test]
    fn stage_tags() {
        assert_eq!(ConversionStage::Open.to_string(), "open");
        assert_eq!(ConversionStage::Decode.to_string(), "decode");
        assert_eq!(ConversionStage::Create.to_string(), "create");
        assert_eq!(ConversionStage::Encode.to_string(), "encode");
        assert_eq!(ConversionStage::Collision.to_string(), "collision");
        assert_eq!(format_tag(ImageFormat::Jpeg), "jpeg");
    }

    #[test]
    fn empty_summary_is_distinct_from_failure() {
        let summary = ConversionSummary::from_outcomes(0, Vec::new());
        assert_eq!(summary.attempted(), 0);
        assert_eq!(summary.status(), RunStatus::NothingToConvert);
        assert!(!summary.is_success());

        let all_failed = ConversionSummary::from_outcomes(1, vec![open_failure("a.jpg")]);
        assert_eq!(all_failed.status(), RunStatus::PartialFailure);
    }

    #[test]
    fn summary_tallies_outcomes() {
        let summary = ConversionSummary::from_outcomes(
            3,
            vec![success("a.jpg"), open_failure("b.jpg"), success("c.jpg")],
        );
        assert_eq!(summary.attempted(), 3);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failures().len(), 1);
        assert_eq!(summary.failures()[0].source(), Path::new("b.jpg"));
        assert_eq!(summary.failures()[0].stage(), Some(ConversionStage::Open));
        assert_eq!(summary.status(), RunStatus::PartialFailure);
    }

    #[test]
    fn summary_reports_stopped_runs() {
        let summary = ConversionSummary::from_outcomes(3, vec![open_failure("a.jpg")]);
        assert_eq!(summary.status(), RunStatus::Stopped);
        assert_eq!(summary.discovered(), 3);
        assert_eq!(summary.attempted(), 1);
    }

    #[test]
    fn all_converted_is_success() {
        let summary = ConversionSummary::from_outcomes(2, vec![success("a.jpg"), success("b.jpg")]);
        assert_eq!(summary.status(), RunStatus::AllConverted);
        assert!(summary.is_success());
    }
}
