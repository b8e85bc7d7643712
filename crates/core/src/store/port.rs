use super::error::StoreError;
use crate::breadth::entity::BreadthSnapshot;
use crate::market::entity::DailyRecord;
use async_trait::async_trait;

/// # Summary
/// 日线主表数据源接口，由清洗后的 bhavcopy 表提供。
///
/// # Invariants
/// - 返回前必须完成表结构校验，调用方拿到的记录满足 (security_id, date) 唯一。
#[async_trait]
pub trait DailyRecordSource: Send + Sync {
    /// # Summary
    /// 一次性加载全部日线记录。
    ///
    /// # Logic
    /// 1. 定位并读取输入表，不存在时返回 `MissingInput`。
    /// 2. 校验必需列与主键唯一性，失败返回 `Schema`。
    /// 3. 转换为 `DailyRecord` 列表。
    ///
    /// # Returns
    /// 成功返回全部记录（可能为空，由调用方决定如何处理）。
    async fn load_records(&self) -> Result<Vec<DailyRecord>, StoreError>;
}

/// # Summary
/// 宽度快照输出接口。
///
/// # Invariants
/// - 写入必须是整体替换：失败时不得留下被截断的输出。
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// 输出目标的可读描述，用于日志。
    fn describe(&self) -> String;

    /// # Summary
    /// 持久化完整的快照序列。
    ///
    /// # Logic
    /// 1. 将快照编码到临时文件。
    /// 2. 编码成功后原子替换目标文件。
    ///
    /// # Arguments
    /// * `snapshots`: 按日期升序排列的快照。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `StoreError`。
    async fn save_snapshots(&self, snapshots: &[BreadthSnapshot]) -> Result<(), StoreError>;
}
