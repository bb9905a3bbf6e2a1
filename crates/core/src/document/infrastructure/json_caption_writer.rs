use std::path::Path;

use crate::document::domain::caption_document::CaptionDocument;
use crate::document::domain::caption_writer::CaptionWriter;
use crate::document::domain::document_error::DocumentError;

/// Writes the caption document as pretty-printed JSON.
pub struct JsonCaptionWriter;

impl CaptionWriter for JsonCaptionWriter {
    fn write(&self, path: &Path, document: &CaptionDocument) -> Result<(), DocumentError> {
        let json = serde_json::to_string_pretty(document)?;
        write_file(path, &json)?;
        log::info!(
            "Wrote {} sentences ({} captions) to {}",
            document.sentences.len(),
            document.window_count(),
            path.display()
        );
        Ok(())
    }
}

/// Writes `contents` to `path`, creating parent directories as needed.
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), DocumentError> {
    let to_write_error = |source| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_write_error)?;
    }
    std::fs::write(path, contents).map_err(to_write_error)
}
