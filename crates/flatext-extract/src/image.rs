//! Image backend.
//!
//! Decodes the upload with the `image` crate, then runs the configured
//! [`OcrEngine`] over the pixels.

use flatext_core::{ExtractedText, FormatKind};
use image::GenericImageView;
use std::sync::Arc;
use tracing::debug;

use crate::config::OcrConfig;
use crate::error::FormatError;
use crate::ocr::{OcrEngine, default_engine};
use crate::traits::FormatExtractor;

/// Backend for `.jpg`, `.jpeg`, `.png`, `.bmp` and `.tiff` files.
pub struct ImageExtractor {
    engine: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    /// Create an image extractor with the build's default OCR engine.
    #[must_use]
    pub fn new(config: &OcrConfig) -> Self {
        Self::with_engine(default_engine(config))
    }

    /// Create an image extractor with a specific OCR engine.
    #[must_use]
    pub fn with_engine(engine: Arc<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    /// Name of the OCR engine in use.
    #[must_use]
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new(&OcrConfig::default())
    }
}

impl FormatExtractor for ImageExtractor {
    fn kind(&self) -> FormatKind {
        FormatKind::Image
    }

    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
        let img = image::load_from_memory(content)?;
        let (width, height) = img.dimensions();
        debug!(
            "Running {} OCR on {}x{} image",
            self.engine.name(),
            width,
            height
        );

        let text = self.engine.recognize(&img)?;
        Ok(ExtractedText::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrError;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    /// Reports the dimensions it was handed instead of reading pixels.
    struct DimensionsOcr;

    impl OcrEngine for DimensionsOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
            Ok(format!("  {}x{} pixels\n", image.width(), image.height()))
        }

        fn name(&self) -> &str {
            "dimensions"
        }
    }

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 8, image::Rgb([255, 255, 255])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        bytes
    }

    #[test]
    fn test_kind() {
        assert_eq!(ImageExtractor::default().kind(), FormatKind::Image);
    }

    #[test]
    fn test_png_reaches_engine() {
        let extractor = ImageExtractor::with_engine(Arc::new(DimensionsOcr));
        let text = extractor.extract(&encode(ImageFormat::Png)).unwrap();
        assert_eq!(text.as_str(), "  12x8 pixels\n");
        assert_eq!(text.finish(), "12x8 pixels");
    }

    #[test]
    fn test_bmp_and_tiff_decode() {
        let extractor = ImageExtractor::with_engine(Arc::new(DimensionsOcr));
        for format in [ImageFormat::Bmp, ImageFormat::Tiff, ImageFormat::Jpeg] {
            let text = extractor.extract(&encode(format)).unwrap();
            assert_eq!(text.finish(), "12x8 pixels", "format {format:?}");
        }
    }

    #[test]
    fn test_undecodable_bytes_fail_before_ocr() {
        let extractor = ImageExtractor::with_engine(Arc::new(DimensionsOcr));
        let err = extractor.extract(b"definitely not an image").unwrap_err();
        assert!(matches!(err, FormatError::Image(_)));
    }

    #[test]
    fn test_engine_failure_propagates() {
        let extractor = ImageExtractor::with_engine(Arc::new(crate::ocr::UnavailableOcr));
        let err = extractor.extract(&encode(ImageFormat::Png)).unwrap_err();
        assert!(matches!(err, FormatError::Ocr(OcrError::Unavailable)));
    }

    #[test]
    fn test_engine_name() {
        let extractor = ImageExtractor::with_engine(Arc::new(DimensionsOcr));
        assert_eq!(extractor.engine_name(), "dimensions");
    }
}
