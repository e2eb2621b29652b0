//! Dispatch table from [`FormatKind`] to backend.

use flatext_core::{ExtractError, FormatKind, Upload};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::traits::FormatExtractor;
use crate::{
    CsvExtractor, ImageExtractor, JsonExtractor, PdfExtractor, SlideshowExtractor,
    SpreadsheetExtractor, TextExtractor, WordExtractor,
};

/// Registry of format backends.
///
/// Immutable once built; cloning shares the backends.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<FormatKind, Arc<dyn FormatExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Create a registry with one backend per supported kind.
    #[must_use]
    pub fn with_defaults(config: &ExtractConfig) -> Self {
        let mut registry = Self::new();
        registry.register(TextExtractor::new());
        registry.register(PdfExtractor::new());
        registry.register(ImageExtractor::new(&config.ocr));
        registry.register(WordExtractor::new());
        registry.register(SlideshowExtractor::new());
        registry.register(JsonExtractor::new());
        registry.register(CsvExtractor::new());
        registry.register(SpreadsheetExtractor::new());
        registry
    }

    /// Register a backend under the kind it reports, replacing any previous one.
    pub fn register<E: FormatExtractor + 'static>(&mut self, extractor: E) {
        let kind = extractor.kind();
        debug!("Registering {} backend", kind);
        self.extractors.insert(kind, Arc::new(extractor));
    }

    /// Get the backend for a kind.
    #[must_use]
    pub fn get(&self, kind: FormatKind) -> Option<Arc<dyn FormatExtractor>> {
        self.extractors.get(&kind).cloned()
    }

    /// Registered kinds, in dispatch-table order.
    #[must_use]
    pub fn kinds(&self) -> Vec<FormatKind> {
        FormatKind::SUPPORTED
            .into_iter()
            .filter(|kind| self.extractors.contains_key(kind))
            .collect()
    }

    /// Every filename suffix this registry accepts.
    #[must_use]
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.kinds()
            .into_iter()
            .flat_map(|kind| kind.extensions().iter().copied())
            .collect()
    }

    /// Extract text from `content`, choosing the backend by `filename` suffix.
    ///
    /// Backend failures, including panics inside parsing libraries, are
    /// reported as [`ExtractError::Processing`]. An unrecognized suffix is
    /// reported with the filename lower-cased.
    pub fn extract(&self, content: &[u8], filename: &str) -> Result<String, ExtractError> {
        let kind = FormatKind::from_filename(filename);
        let extractor = self.get(kind).ok_or_else(|| {
            warn!("Unsupported file type: {}", filename);
            ExtractError::UnsupportedFormat(filename.to_lowercase())
        })?;

        debug!("Extracting {} ({} bytes) as {}", filename, content.len(), kind);

        let outcome = catch_unwind(AssertUnwindSafe(|| extractor.extract(content)))
            .map_err(|payload| panic_message(payload.as_ref()))
            .and_then(|result| result.map_err(|e| e.to_string()));

        match outcome {
            Ok(text) => {
                let text = text.finish();
                info!("Extracted {} chars from {} ({})", text.len(), filename, kind);
                Ok(text)
            }
            Err(message) => {
                warn!("Failed to extract {} as {}: {}", filename, kind, message);
                Err(ExtractError::Processing(message))
            }
        }
    }

    /// Extract text from an optional upload.
    pub fn extract_upload(&self, upload: Option<&Upload>) -> Result<String, ExtractError> {
        let upload = upload.ok_or(ExtractError::NoFileProvided)?;
        self.extract(&upload.content, &upload.filename)
    }

    /// Run [`extract`](Self::extract) on the blocking thread pool.
    pub async fn extract_async(
        &self,
        content: Vec<u8>,
        filename: String,
    ) -> Result<String, ExtractError> {
        let registry = self.clone();
        tokio::task::spawn_blocking(move || registry.extract(&content, &filename))
            .await
            .map_err(|e| ExtractError::Processing(format!("Task join error: {e}")))?
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults(&ExtractConfig::default())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "backend panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use flatext_core::ExtractedText;
    use tempfile::tempdir;

    struct PanickingExtractor;

    impl FormatExtractor for PanickingExtractor {
        fn kind(&self) -> FormatKind {
            FormatKind::Json
        }

        fn extract(&self, _content: &[u8]) -> Result<ExtractedText, FormatError> {
            panic!("parser exploded");
        }
    }

    struct ShoutingExtractor;

    impl FormatExtractor for ShoutingExtractor {
        fn kind(&self) -> FormatKind {
            FormatKind::Text
        }

        fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError> {
            Ok(ExtractedText::from(
                String::from_utf8_lossy(content).to_uppercase(),
            ))
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ExtractorRegistry::new();
        assert!(registry.extractors.is_empty());
        assert!(registry.supported_extensions().is_empty());
    }

    #[test]
    fn test_with_defaults_registers_every_kind() {
        let registry = ExtractorRegistry::with_defaults(&ExtractConfig::default());
        assert_eq!(registry.kinds(), FormatKind::SUPPORTED.to_vec());
        for kind in FormatKind::SUPPORTED {
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
        assert!(registry.get(FormatKind::Unsupported).is_none());
    }

    #[test]
    fn test_supported_extensions() {
        let registry = ExtractorRegistry::default();
        assert_eq!(
            registry.supported_extensions(),
            vec![
                "txt", "pdf", "jpg", "jpeg", "png", "bmp", "tiff", "docx", "pptx", "json", "csv",
                "xls", "xlsx"
            ]
        );
    }

    #[test]
    fn test_register_replaces_backend() {
        let mut registry = ExtractorRegistry::default();
        registry.register(ShoutingExtractor);
        assert_eq!(registry.extract(b" quiet ", "a.txt").unwrap(), "QUIET");
    }

    #[test]
    fn test_unregistered_kind_is_unsupported() {
        let registry = ExtractorRegistry::new();
        let err = registry.extract(b"{}", "data.json").unwrap_err();
        assert_eq!(err, ExtractError::UnsupportedFormat("data.json".to_string()));
    }

    #[test]
    fn test_unknown_suffix_lowercases_filename() {
        let registry = ExtractorRegistry::default();
        let err = registry.extract(b"", "Report.XYZ").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file type: report.xyz");
    }

    #[test]
    fn test_backend_error_becomes_processing() {
        let registry = ExtractorRegistry::default();
        let err = registry.extract(b"{broken", "data.json").unwrap_err();
        match err {
            ExtractError::Processing(message) => assert!(message.starts_with("invalid JSON")),
            other => panic!("Expected Processing error, got {other:?}"),
        }
    }

    #[test]
    fn test_panic_becomes_processing() {
        let mut registry = ExtractorRegistry::new();
        registry.register(PanickingExtractor);
        let err = registry.extract(b"{}", "data.json").unwrap_err();
        assert_eq!(err, ExtractError::Processing("parser exploded".to_string()));
    }

    #[test]
    fn test_output_is_trimmed() {
        let registry = ExtractorRegistry::default();
        assert_eq!(registry.extract(b"\n\n  body \t\n", "notes.txt").unwrap(), "body");
    }

    #[test]
    fn test_extract_upload_none() {
        let registry = ExtractorRegistry::default();
        assert_eq!(
            registry.extract_upload(None).unwrap_err(),
            ExtractError::NoFileProvided
        );
    }

    #[test]
    fn test_extract_upload_from_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("rows.csv");
        std::fs::write(&path, "a,b\nc,d\n").unwrap();

        let upload = Upload::new(std::fs::read(&path).unwrap(), "rows.csv");
        let registry = ExtractorRegistry::default();
        assert_eq!(registry.extract_upload(Some(&upload)).unwrap(), "a b\nc d");
    }

    #[tokio::test]
    async fn test_extract_async() {
        let registry = ExtractorRegistry::default();
        let text = registry
            .extract_async(br#"{"text": "async"}"#.to_vec(), "doc.json".to_string())
            .await
            .unwrap();
        assert_eq!(text, "async");
    }

    #[tokio::test]
    async fn test_extract_async_unsupported() {
        let registry = Arc::new(ExtractorRegistry::default());
        let err = registry
            .extract_async(vec![1, 2, 3], "blob.bin".to_string())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
