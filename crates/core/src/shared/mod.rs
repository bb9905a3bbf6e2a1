pub mod config;
pub mod constants;
pub mod timing_error;
