pub mod batch_executor;
pub mod build_captions_use_case;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod sentence_pipeline;
