pub mod json_caption_writer;
pub mod json_record_reader;
pub mod srt_caption_writer;
