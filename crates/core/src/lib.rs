pub mod alignment;
pub mod captions;
pub mod document;
pub mod pipeline;
pub mod reconstruction;
pub mod shared;
pub mod text;
