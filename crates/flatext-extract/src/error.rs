//! Backend error type.
//!
//! [`FormatError`] wraps whatever the parsing libraries report. It stays inside
//! this crate: [`ExtractorRegistry`](crate::ExtractorRegistry) converts it into
//! [`ExtractError::Processing`](flatext_core::ExtractError::Processing) before
//! returning to the caller.

use thiserror::Error;

use crate::ocr::OcrError;

/// Failure raised by a format backend.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("invalid PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("cannot identify image: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("invalid Word document: {0}")]
    Word(#[from] docx_rs::ReaderError),

    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid XML attribute: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally valid container with unexpected content.
    #[error("malformed document: {0}")]
    Malformed(String),
}
