use std::fmt::Write as _;
use std::path::Path;

use super::json_caption_writer::write_file;
use crate::document::domain::caption_document::CaptionDocument;
use crate::document::domain::caption_writer::CaptionWriter;
use crate::document::domain::document_error::DocumentError;

/// Exports every caption on the absolute narration timeline as SubRip.
pub struct SrtCaptionWriter;

impl SrtCaptionWriter {
    pub fn render(document: &CaptionDocument) -> String {
        let mut out = String::new();
        let windows = document.sentences.iter().flat_map(|s| s.absolute_windows());
        for (i, window) in windows.enumerate() {
            let _ = write!(
                out,
                "{}\n{} --> {}\n{}\n\n",
                i + 1,
                format_timestamp(window.start),
                format_timestamp(window.end),
                window.text
            );
        }
        out
    }
}

impl CaptionWriter for SrtCaptionWriter {
    fn write(&self, path: &Path, document: &CaptionDocument) -> Result<(), DocumentError> {
        write_file(path, &Self::render(document))?;
        log::info!("Wrote {} SRT cues to {}", document.window_count(), path.display());
        Ok(())
    }
}

/// `HH:MM:SS,mmm`, rounded to the millisecond.
fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let (hours, rest) = (total_ms / 3_600_000, total_ms % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (secs, millis) = (rest / 1000, rest % 1000);
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}
