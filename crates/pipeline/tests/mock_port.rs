use async_trait::async_trait;
use breadth_core::breadth::entity::BreadthSnapshot;
use breadth_core::market::entity::DailyRecord;
use breadth_core::store::error::StoreError;
use breadth_core::store::port::{DailyRecordSource, SnapshotSink};
use std::sync::Mutex;

/// 内存数据源：返回预置记录，或预置错误。
pub struct MemorySource {
    pub result: Result<Vec<DailyRecord>, StoreError>,
}

#[async_trait]
impl DailyRecordSource for MemorySource {
    async fn load_records(&self) -> Result<Vec<DailyRecord>, StoreError> {
        self.result.clone()
    }
}

/// 记录每次写入内容的输出目标。
#[derive(Default)]
pub struct RecordingSink {
    pub writes: Mutex<Vec<Vec<BreadthSnapshot>>>,
}

impl RecordingSink {
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn last_write(&self) -> Vec<BreadthSnapshot> {
        self.writes.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl SnapshotSink for RecordingSink {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn save_snapshots(&self, snapshots: &[BreadthSnapshot]) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(snapshots.to_vec());
        Ok(())
    }
}

/// 总是写入失败的输出目标。
pub struct FailingSink;

#[async_trait]
impl SnapshotSink for FailingSink {
    fn describe(&self) -> String {
        "failing".to_string()
    }

    async fn save_snapshots(&self, _snapshots: &[BreadthSnapshot]) -> Result<(), StoreError> {
        Err(StoreError::Encode("disk full".to_string()))
    }
}
