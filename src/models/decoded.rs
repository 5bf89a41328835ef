use image::{DynamicImage, ImageFormat};

#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    /// Format detected from the file contents
    pub format: Option<ImageFormat>,
}
