use crate::error::Result;
use crate::models::conversion::{ConversionInput, ConversionSummary};

// Facade interface, coordinates one batch conversion run
pub trait ConversionFacadeTrait: Send + Sync {
    /// Discovers the source files under the root and converts each of them
    /// # Arguments
    /// - input: root directory, extension pair and run policies
    /// # Returns
    /// - the run summary; only a failed walk (or worker pool setup) is an error,
    ///   per-file failures are inside the summary
    fn execute_conversion(&self, input: ConversionInput) -> Result<ConversionSummary>;
}
