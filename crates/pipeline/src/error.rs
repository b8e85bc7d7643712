use breadth_core::store::error::StoreError;
use thiserror::Error;

/// # Summary
/// 流水线层的统一错误类型。
///
/// # Invariants
/// - 输入类错误（`MissingInput` / `Schema` / `EmptyInput`）一定发生在任何输出写入之前。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing input: {0}")]
    MissingInput(String),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Input table is empty")]
    EmptyInput,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Persist error: {0}")]
    Persist(String),
    #[error("Compute task failed: {0}")]
    Task(String),
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingInput(path) => PipelineError::MissingInput(path),
            StoreError::Schema(msg) => PipelineError::Schema(msg),
            StoreError::Io(msg) => PipelineError::Io(msg),
            StoreError::Encode(msg) => PipelineError::Persist(msg),
        }
    }
}
