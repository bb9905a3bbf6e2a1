pub mod caption_document;
pub mod caption_writer;
pub mod document_error;
pub mod record_reader;
pub mod sentence_record;
