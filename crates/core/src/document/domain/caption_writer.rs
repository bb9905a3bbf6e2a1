use std::path::Path;

use super::caption_document::CaptionDocument;
use super::document_error::DocumentError;

/// Domain interface for persisting finished captions.
pub trait CaptionWriter: Send {
    fn write(&self, path: &Path, document: &CaptionDocument) -> Result<(), DocumentError>;
}
