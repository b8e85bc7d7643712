use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理输入缺失、表结构不符及读写失败等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// 输入文件不存在
    #[error("Missing input: {0}")]
    MissingInput(String),
    /// 输入表结构不符合约定（缺列、类型错误、空值或重复主键）
    #[error("Schema error: {0}")]
    Schema(String),
    /// 文件读写失败
    #[error("IO error: {0}")]
    Io(String),
    /// 输出编码失败
    #[error("Encode error: {0}")]
    Encode(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}
