//! Photo compression for note attachments.

use std::io::Cursor;

use image::{codecs::jpeg::JpegEncoder, DynamicImage, GenericImageView};

use crate::{Error, Result};

/// Longest side, in pixels, of a stored photo.
pub const DEFAULT_MAX_DIMENSION: u32 = 1600;
/// JPEG quality used for stored photos.
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// Settings for photo compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCompression {
    /// Longest allowed side in pixels
    pub max_dimension: u32,
    /// JPEG quality, 1 to 100
    pub jpeg_quality: u8,
}

impl Default for ImageCompression {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Result of compressing several photos. Undecodable inputs are counted, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedBatch {
    pub images: Vec<Vec<u8>>,
    pub skipped: usize,
}

/// Downscale a photo so its longest side fits `max_dimension` and re-encode it as JPEG.
///
/// Smaller images keep their size; they are only re-encoded.
pub fn compress_image(source_bytes: &[u8], options: ImageCompression) -> Result<Vec<u8>> {
    if source_bytes.is_empty() {
        return Err(Error::InvalidInput(
            "Image source bytes cannot be empty".to_string(),
        ));
    }
    if options.max_dimension == 0 {
        return Err(Error::InvalidInput(
            "Image max dimension must be greater than zero".to_string(),
        ));
    }

    let source = image::load_from_memory(source_bytes)
        .map_err(|error| Error::Media(format!("Failed to decode image: {error}")))?;

    let (width, height) = source.dimensions();
    let resized = if width.max(height) <= options.max_dimension {
        source
    } else {
        source.resize(
            options.max_dimension,
            options.max_dimension,
            image::imageops::FilterType::Triangle,
        )
    };

    encode_jpeg(&resized, options.jpeg_quality.clamp(1, 100))
}

/// Compress each photo, skipping the ones that fail with a warning.
pub fn compress_images(sources: &[Vec<u8>], options: ImageCompression) -> CompressedBatch {
    let mut batch = CompressedBatch::default();
    for (index, source) in sources.iter().enumerate() {
        match compress_image(source, options) {
            Ok(bytes) => batch.images.push(bytes),
            Err(error) => {
                tracing::warn!("Skipping image {index}: {error}");
                batch.skipped += 1;
            }
        }
    }
    batch
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut cursor = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut cursor, quality)
        .encode_image(&rgb)
        .map_err(|error| Error::Media(format!("Failed to encode JPEG: {error}")))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgba};

    fn source_png(width: u32, height: u32) -> Vec<u8> {
        let image = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_fn(width, height, |x, _y| {
            Rgba([u8::try_from(x % 256).unwrap(), 90, 240, 255])
        });

        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut cursor, ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    fn dimensions(jpeg: &[u8]) -> (u32, u32) {
        image::load_from_memory(jpeg).unwrap().dimensions()
    }

    #[test]
    fn compress_bounds_longest_side_and_keeps_ratio() {
        let source = source_png(800, 400);
        let result = compress_image(
            &source,
            ImageCompression {
                max_dimension: 200,
                jpeg_quality: 70,
            },
        )
        .unwrap();

        assert_eq!(dimensions(&result), (200, 100));
        assert_eq!(
            image::guess_format(&result).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn compress_does_not_upscale() {
        let source = source_png(60, 30);
        let result = compress_image(&source, ImageCompression::default()).unwrap();
        assert_eq!(dimensions(&result), (60, 30));
    }

    #[test]
    fn compress_rejects_empty_and_invalid_input() {
        assert!(matches!(
            compress_image(&[], ImageCompression::default()).unwrap_err(),
            Error::InvalidInput(_)
        ));
        match compress_image(b"not-an-image", ImageCompression::default()).unwrap_err() {
            Error::Media(message) => assert!(message.contains("decode")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn batch_skips_undecodable_images() {
        let sources = vec![source_png(10, 10), b"junk".to_vec(), source_png(20, 5)];
        let batch = compress_images(&sources, ImageCompression::default());
        assert_eq!(batch.images.len(), 2);
        assert_eq!(batch.skipped, 1);
    }
}
