//! Settings consumed by the backends.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend settings handed to [`ExtractorRegistry::with_defaults`](crate::ExtractorRegistry::with_defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Optical character recognition for images.
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Tesseract settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language code (`eng`, `deu`, `eng+fra`, ...).
    #[serde(default = "default_language")]
    pub language: String,

    /// Directory holding `*.traineddata` files. Tesseract's own default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
}

fn default_language() -> String {
    "eng".to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            data_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_is_english() {
        let config = ExtractConfig::default();
        assert_eq!(config.ocr.language, "eng");
        assert!(config.ocr.data_path.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExtractConfig = serde_json::from_str(r#"{"ocr": {}}"#).unwrap();
        assert_eq!(config, ExtractConfig::default());

        let config: ExtractConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_data_path_override() {
        let config: OcrConfig =
            serde_json::from_str(r#"{"language": "deu", "data_path": "/opt/tessdata"}"#).unwrap();
        assert_eq!(config.language, "deu");
        assert_eq!(config.data_path, Some(PathBuf::from("/opt/tessdata")));
    }
}
