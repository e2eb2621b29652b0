//! The backend interface.

use flatext_core::{ExtractedText, FormatKind};

use crate::error::FormatError;

/// A text extraction strategy for one [`FormatKind`].
///
/// Implementations are pure functions of the input bytes: they hold no
/// per-call state and must be safe to share across threads.
pub trait FormatExtractor: Send + Sync {
    /// The kind this backend handles.
    fn kind(&self) -> FormatKind;

    /// Extract text from raw file content.
    ///
    /// The returned buffer is untrimmed; the registry normalizes it.
    fn extract(&self, content: &[u8]) -> Result<ExtractedText, FormatError>;
}
