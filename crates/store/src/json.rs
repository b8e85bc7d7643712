use crate::fs::write_atomically;
use async_trait::async_trait;
use breadth_core::breadth::entity::BreadthSnapshot;
use breadth_core::store::error::StoreError;
use breadth_core::store::port::SnapshotSink;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// # Summary
/// 行式 JSON 快照导出，供非列式消费者使用。
///
/// # Invariants
/// * 输出为对象数组，每个对象一行，键名与 Parquet 列名一致。
/// * 无定义的值写为 null。
pub struct JsonSnapshotSink {
    path: PathBuf,
}

impl JsonSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// 将快照序列编码为 JSON 字节。
pub fn encode_snapshots(snapshots: &[BreadthSnapshot]) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(snapshots).map_err(|e| StoreError::Encode(e.to_string()))
}

#[async_trait]
impl SnapshotSink for JsonSnapshotSink {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    async fn save_snapshots(&self, snapshots: &[BreadthSnapshot]) -> Result<(), StoreError> {
        let payload = encode_snapshots(snapshots)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            write_atomically(&path, |file| {
                let mut writer = BufWriter::new(file);
                writer.write_all(&payload)?;
                writer.flush()?;
                Ok(())
            })
        })
        .await
        .map_err(|e| StoreError::Io(e.to_string()))??;

        info!("Exported {} snapshots to {}", snapshots.len(), self.path.display());
        Ok(())
    }
}
