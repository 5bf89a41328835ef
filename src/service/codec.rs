use std::borrow::Cow;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use log::warn;

use crate::error::ConversionError;
use crate::models::conversion::format_tag;
use crate::models::decoded::DecodedImage;
use crate::service::traits::i_service::ImageServiceTrait;

/// Codec backed by the `image` crate.
///
/// Decoding sniffs the format from the file's leading bytes, never from its
/// name. Every file handle lives only inside the call that opened it.
pub struct ImageCodecService;

impl ImageServiceTrait for ImageCodecService {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConversionError> {
        let file = File::open(path).map_err(|source| ConversionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let reader = ImageReader::new(BufReader::new(file))
            .with_guessed_format()
            .map_err(|source| ConversionError::Decode {
                path: path.to_path_buf(),
                format: None,
                source: ImageError::IoError(source),
            })?;
        let format = reader.format();
        let image = reader.decode().map_err(|source| ConversionError::Decode {
            path: path.to_path_buf(),
            format: format.map(format_tag),
            source,
        })?;

        Ok(DecodedImage { image, format })
    }

    fn encode(
        &self,
        image: &DynamicImage,
        output: &Path,
        format: ImageFormat,
    ) -> Result<(), ConversionError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(output)
            .map_err(|source| ConversionError::Create {
                path: output.to_path_buf(),
                source,
            })?;

        let mut writer = BufWriter::new(file);
        let written = storable_for(image, format)
            .write_to(&mut writer, format)
            .and_then(|()| writer.flush().map_err(ImageError::IoError));

        if let Err(source) = written {
            drop(writer);
            if let Err(e) = fs::remove_file(output) {
                warn!("Could not remove partial output {}: {}", output.display(), e);
            }
            return Err(ConversionError::Encode {
                path: output.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}

// JPEG has no alpha channel and no 16-bit or float samples
fn storable_for(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    match (format, image) {
        (ImageFormat::Jpeg, DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_)) => {
            Cow::Borrowed(image)
        }
        (ImageFormat::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        _ => Cow::Borrowed(image),
    }
}
