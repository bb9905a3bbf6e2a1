use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::alignment::domain::chunk_claimer::ChunkClaimer;
use crate::alignment::domain::text_chunk::TextChunk;
use crate::alignment::domain::word_timestamp::WordTimestamp;
use crate::document::domain::document_error::DocumentError;
use crate::document::domain::record_reader::RecordReader;
use crate::document::domain::sentence_record::SentenceRecord;
use crate::text::domain::text_normalizer::TextNormalizer;

#[derive(Deserialize)]
struct InputDocument {
    sentences: Vec<InputSentence>,
    #[serde(default)]
    visual_plan: Vec<InputChunk>,
}

#[derive(Deserialize)]
struct InputSentence {
    #[serde(default)]
    sentence: String,
    #[serde(default)]
    sentence_duration: f64,
    #[serde(default)]
    words: Vec<WordTimestamp>,
    #[serde(default)]
    chunks: Option<Vec<InputChunk>>,
}

#[derive(Deserialize)]
struct InputChunk {
    chunk_text: String,
    #[serde(default)]
    visual: Option<serde_json::Value>,
}

/// Reads sentence records from the narration JSON document.
///
/// Sentences that carry their own `chunks` use them as given. The others
/// claim consecutive entries of the top-level `visual_plan`.
pub struct JsonRecordReader {
    normalizer: Arc<TextNormalizer>,
}

impl JsonRecordReader {
    pub fn new(normalizer: Arc<TextNormalizer>) -> Self {
        Self { normalizer }
    }

    pub fn records_from_str(&self, json: &str) -> Result<Vec<SentenceRecord>, serde_json::Error> {
        let input: InputDocument = serde_json::from_str(json)?;
        let claimer = ChunkClaimer::new(&self.normalizer);
        let plan_texts: Vec<&str> = input
            .visual_plan
            .iter()
            .map(|c| c.chunk_text.as_str())
            .collect();
        let mut cursor = 0;

        let records = input
            .sentences
            .into_iter()
            .map(|sentence| {
                let chunks = match sentence.chunks {
                    Some(chunks) => chunks
                        .into_iter()
                        .map(|c| self.chunk(&c.chunk_text, c.visual))
                        .collect(),
                    None if plan_texts.is_empty() => Vec::new(),
                    None => claimer
                        .claim(&sentence.sentence, &plan_texts, &mut cursor)
                        .into_iter()
                        .map(|i| {
                            let entry = &input.visual_plan[i];
                            self.chunk(&entry.chunk_text, entry.visual.clone())
                        })
                        .collect(),
                };
                SentenceRecord::new(
                    &sentence.sentence,
                    sentence.sentence_duration,
                    chunks,
                    sentence.words,
                )
            })
            .collect();

        if cursor < plan_texts.len() {
            log::warn!(
                "{} visual plan chunks were not claimed by any sentence",
                plan_texts.len() - cursor
            );
        }
        Ok(records)
    }

    fn chunk(&self, text: &str, visual: Option<serde_json::Value>) -> TextChunk {
        TextChunk::new(text, visual, &self.normalizer)
    }
}

impl RecordReader for JsonRecordReader {
    fn read_records(&self, path: &Path) -> Result<Vec<SentenceRecord>, DocumentError> {
        let json = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let records = self
            .records_from_str(&json)
            .map_err(|source| DocumentError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Read {} sentences from {}", records.len(), path.display());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::infrastructure::korean_numeral_formatter::KoreanNumeralFormatter;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn reader() -> JsonRecordReader {
        JsonRecordReader::new(Arc::new(TextNormalizer::new(Box::new(KoreanNumeralFormatter))))
    }

    #[test]
    fn test_explicit_chunks() {
        let json = r#"{
            "sentences": [{
                "sentence": "the cat sat",
                "sentence_duration": 2.0,
                "words": [{"word": "the", "start": 0.0, "end": 0.3, "confidence": 0.9}],
                "chunks": [{"chunk_text": "the cat sat", "visual": {"image": "cat.png"}}]
            }]
        }"#;
        let records = reader().records_from_str(json).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_sentence, "the cat sat");
        assert_relative_eq!(records[0].measured_duration, 2.0);
        assert_eq!(records[0].words[0].text, "the");
        assert_eq!(records[0].chunks[0].tokens, vec!["the", "cat", "sat"]);
        assert_eq!(records[0].chunks[0].visual, Some(serde_json::json!({"image": "cat.png"})));
    }

    #[test]
    fn test_sentences_claim_from_visual_plan() {
        let json = r#"{
            "sentences": [
                {"sentence": "사과 3개를 샀다.", "sentence_duration": 1.5, "words": []},
                {"sentence": "맛있었다.", "sentence_duration": 1.0, "words": []}
            ],
            "visual_plan": [
                {"chunk_text": "사과 3개를", "visual": 1},
                {"chunk_text": "샀다.", "visual": 2},
                {"chunk_text": "맛있었다.", "visual": 3}
            ]
        }"#;
        let records = reader().records_from_str(json).unwrap();

        assert_eq!(records[0].chunks.len(), 2);
        assert_eq!(records[0].chunks[0].tokens, vec!["사과", "삼개를"]);
        assert_eq!(records[0].chunks[1].visual, Some(serde_json::json!(2)));
        assert_eq!(records[1].chunks.len(), 1);
        assert_eq!(records[1].chunks[0].visual, Some(serde_json::json!(3)));
    }

    #[test]
    fn test_missing_fields_default() {
        let records = reader()
            .records_from_str(r#"{"sentences": [{"sentence": "hi"}]}"#)
            .unwrap();
        assert!(records[0].words.is_empty());
        assert!(records[0].chunks.is_empty());
        assert_relative_eq!(records[0].measured_duration, 0.0);
    }

    #[test]
    fn test_read_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"sentences": [{{"sentence": "a", "sentence_duration": 1.0}}]}}"#).unwrap();
        let records = reader().read_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = reader().read_records(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = reader()
            .read_records(Path::new("/nonexistent/narration.json"))
            .unwrap_err();
        assert!(matches!(err, DocumentError::Read { .. }));
    }
}
