//! Image processors.
//!
//! The pipeline only knows the [`ImageProcessor`] trait: bytes of an accepted
//! upload in, PNG bytes out. [`PngNormalizer`] is the processor shipped with
//! the server; a background-removal model can be plugged in through
//! [`crate::api::AppState`] without touching the HTTP layer.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{ProcessError, ProcessResult};

/// Turns one uploaded image into one PNG.
///
/// Called from blocking worker threads, hence `Send + Sync`.
pub trait ImageProcessor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    fn process(&self, input: &[u8]) -> ProcessResult<Vec<u8>>;
}

/// Decodes any accepted format and re-encodes it as an RGBA PNG.
///
/// The alpha channel is always present in the output so results can be
/// composited the same way whatever the input format was.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngNormalizer;

impl ImageProcessor for PngNormalizer {
    fn name(&self) -> &str {
        "png-normalizer"
    }

    fn process(&self, input: &[u8]) -> ProcessResult<Vec<u8>> {
        let decoded = image::load_from_memory(input).map_err(|e| ProcessError::Decode(e.to_string()))?;
        let rgba = decoded.to_rgba8();

        let mut out = Vec::new();
        let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Default, FilterType::Adaptive);
        encoder
            .write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
            .map_err(|e| ProcessError::Encode(e.to_string()))?;

        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// A small opaque test image encoded in `format`.
    pub(crate) fn sample_image(format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 60, y as u8 * 80, 200]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_png_normalizer_outputs_rgba_png() {
        for format in [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Jpeg] {
            let out = PngNormalizer.process(&sample_image(format)).unwrap();

            assert_eq!(image::guess_format(&out).unwrap(), ImageFormat::Png);
            let decoded = image::load_from_memory(&out).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (4, 3));
            assert!(decoded.color().has_alpha());
        }
    }

    #[test]
    fn test_png_normalizer_rejects_garbage() {
        let err = PngNormalizer.process(b"definitely not an image").unwrap_err();
        assert!(matches!(err, ProcessError::Decode(_)));
    }
}
