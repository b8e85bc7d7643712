pub mod config;
mod fs;
pub mod json;
pub mod parquet;
