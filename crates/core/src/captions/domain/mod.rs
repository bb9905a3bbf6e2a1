pub mod caption_chunker;
pub mod caption_window;
pub mod duration_rescaler;
