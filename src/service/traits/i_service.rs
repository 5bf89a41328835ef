use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::error::{ConversionError, DiscoveryError};
use crate::models::conversion::ConversionSpec;
use crate::models::decoded::DecodedImage;
use crate::models::file::{FileDiscoveryInput, FileList};

// Discovery service interface, collects the files to convert
pub trait DiscoveryServiceTrait: Send + Sync {
    /// Walks the root directory and collects files carrying the source extension
    /// # Arguments
    /// - input: root directory and link policy
    /// - spec: extension pair and match policy
    /// # Returns
    /// - the matching files in walk order, or the first walk error
    fn discover(
        &self,
        input: &FileDiscoveryInput,
        spec: &ConversionSpec,
    ) -> Result<FileList, DiscoveryError>;
}

// Image service interface, reads and writes image files
pub trait ImageServiceTrait: Send + Sync {
    /// Opens a file and decodes it, detecting the format from its contents
    /// # Arguments
    /// - path: source file
    /// # Returns
    /// - the decoded image and its detected format, or an open/decode error
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConversionError>;

    /// Creates (or truncates) the output file and encodes the image into it
    /// # Arguments
    /// - image: decoded pixels
    /// - output: destination file
    /// - format: target encoder
    /// # Returns
    /// - nothing on success, or a create/encode error
    fn encode(
        &self,
        image: &DynamicImage,
        output: &Path,
        format: ImageFormat,
    ) -> Result<(), ConversionError>;
}
