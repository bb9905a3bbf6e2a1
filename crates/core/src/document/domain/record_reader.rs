use std::path::Path;

use super::document_error::DocumentError;
use super::sentence_record::SentenceRecord;

/// Domain interface for loading the sentences of a narration.
pub trait RecordReader: Send {
    /// Reads every sentence in narration order, with chunks already resolved.
    fn read_records(&self, path: &Path) -> Result<Vec<SentenceRecord>, DocumentError>;
}
