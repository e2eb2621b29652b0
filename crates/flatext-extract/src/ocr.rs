//! Optical character recognition for decoded images.
//!
//! [`ImageExtractor`](crate::ImageExtractor) hands every decoded image to an
//! [`OcrEngine`]. With the `ocr` feature the engine is [`TesseractOcr`];
//! without it, [`UnavailableOcr`] fails every call so image uploads surface a
//! processing error instead of silently returning nothing.

use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

use crate::config::OcrConfig;

/// Error type for OCR operations.
#[derive(Debug, Error)]
pub enum OcrError {
    /// No engine compiled in.
    #[error("OCR support is not available in this build (enable the `ocr` feature)")]
    Unavailable,

    /// Re-encoding the image for the engine failed.
    #[error("image preprocessing failed: {0}")]
    Preprocess(String),

    /// The engine failed to initialize or recognize.
    #[error("{0}")]
    Engine(String),
}

/// Turns pixels into text.
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;

    /// Engine name, for logs.
    fn name(&self) -> &str;
}

/// The engine selected by the build's feature set.
#[must_use]
pub fn default_engine(config: &OcrConfig) -> Arc<dyn OcrEngine> {
    #[cfg(feature = "ocr")]
    {
        Arc::new(TesseractOcr::new(config.clone()))
    }
    #[cfg(not(feature = "ocr"))]
    {
        let _ = config;
        Arc::new(UnavailableOcr)
    }
}

/// Whether this build carries a working OCR engine (the `ocr` feature).
#[must_use]
pub const fn ocr_enabled() -> bool {
    cfg!(feature = "ocr")
}

/// Engine used when the crate is built without OCR support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableOcr;

impl OcrEngine for UnavailableOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        Err(OcrError::Unavailable)
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

#[cfg(feature = "ocr")]
pub use tesseract_engine::TesseractOcr;

#[cfg(feature = "ocr")]
mod tesseract_engine {
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use tesseract::Tesseract;
    use tracing::debug;

    use super::{OcrEngine, OcrError};
    use crate::config::OcrConfig;

    /// Tesseract-backed engine.
    ///
    /// A fresh Tesseract handle is created per call; handles are not `Sync`.
    #[derive(Debug, Clone)]
    pub struct TesseractOcr {
        config: OcrConfig,
    }

    impl TesseractOcr {
        /// Create an engine with the given language and data directory.
        #[must_use]
        pub fn new(config: OcrConfig) -> Self {
            Self { config }
        }
    }

    impl OcrEngine for TesseractOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
            let mut png = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .map_err(|e| OcrError::Preprocess(e.to_string()))?;

            let data_path = self
                .config
                .data_path
                .as_deref()
                .map(|p| p.to_string_lossy().into_owned());

            debug!(
                "Running tesseract ({}x{}, lang {})",
                image.width(),
                image.height(),
                self.config.language
            );

            let mut engine = Tesseract::new(data_path.as_deref(), Some(&self.config.language))
                .map_err(|e| OcrError::Engine(e.to_string()))?
                .set_image_from_mem(&png)
                .map_err(|e| OcrError::Engine(e.to_string()))?
                .recognize()
                .map_err(|e| OcrError::Engine(e.to_string()))?;

            engine
                .get_text()
                .map_err(|e| OcrError::Engine(e.to_string()))
        }

        fn name(&self) -> &str {
            "tesseract"
        }
    }
}
