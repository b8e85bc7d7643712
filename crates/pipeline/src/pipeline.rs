use crate::error::PipelineError;
use breadth_aggregate::aggregate_breadth;
use breadth_core::breadth::entity::BreadthSnapshot;
use breadth_core::market::entity::DailyRecord;
use breadth_core::store::port::{DailyRecordSource, SnapshotSink};
use breadth_indicator::compute_indicators;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// # Summary
/// 单次运行的统计摘要。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    // 输入日线行数
    pub input_rows: usize,
    // 输入中的证券数量
    pub securities: usize,
    // 写出的快照行数
    pub snapshots: usize,
    // 输出窗口的首尾交易日
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// # Summary
/// 纯计算部分：指标阶段接聚合阶段。
///
/// # Logic
/// 1. 按证券并行计算滚动指标。
/// 2. 按交易日横截面汇总，并截取 `display_from` 之后的窗口。
pub fn compute_breadth(
    records: Vec<DailyRecord>,
    display_from: Option<NaiveDate>,
) -> Vec<BreadthSnapshot> {
    let indicators = compute_indicators(records);
    aggregate_breadth(&indicators, display_from)
}

/// # Summary
/// 市场宽度流水线，系统的应用服务层门面。
/// 仅依赖 `breadth-core` 中的端口定义，数据源与输出目标通过构造函数注入。
///
/// # Invariants
/// - 每次运行都基于完整输入全量重算，不依赖上一次运行的任何状态。
/// - 任何输出写入都发生在计算全部成功之后。
pub struct BreadthPipeline {
    // 日线主表数据源
    source: Arc<dyn DailyRecordSource>,
    // 输出目标，按顺序写入
    sinks: Vec<Arc<dyn SnapshotSink>>,
    // 输出窗口下界（包含）
    display_from: Option<NaiveDate>,
}

impl BreadthPipeline {
    /// # Summary
    /// 创建流水线实例。
    ///
    /// # Arguments
    /// * `source` - 日线数据源的具体实现。
    /// * `sinks` - 快照输出目标的具体实现。
    pub fn new(source: Arc<dyn DailyRecordSource>, sinks: Vec<Arc<dyn SnapshotSink>>) -> Self {
        Self {
            source,
            sinks,
            display_from: None,
        }
    }

    /// 设置输出窗口的起始日期。
    pub fn with_display_from(mut self, display_from: Option<NaiveDate>) -> Self {
        self.display_from = display_from;
        self
    }

    /// # Summary
    /// 加载输入并完成两个计算阶段，不写任何输出。
    ///
    /// # Logic
    /// 1. 从数据源加载全部日线，缺失或结构错误时立即失败。
    /// 2. 输入为空时返回 `EmptyInput`，不生成空输出。
    /// 3. 在阻塞线程池中执行指标与聚合计算。
    ///
    /// # Returns
    /// 快照序列与统计摘要（尚未写出）。
    pub async fn compute(&self) -> Result<(Vec<BreadthSnapshot>, PipelineReport), PipelineError> {
        let records = self.source.load_records().await?;
        if records.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let input_rows = records.len();
        let securities = records
            .iter()
            .map(|r| r.security_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        info!("Pipeline input: {input_rows} rows, {securities} securities");

        let display_from = self.display_from;
        let snapshots = tokio::task::spawn_blocking(move || compute_breadth(records, display_from))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?;

        if snapshots.is_empty() {
            warn!("No trading dates on or after {display_from:?}; output will be empty");
        }

        let report = PipelineReport {
            input_rows,
            securities,
            snapshots: snapshots.len(),
            first_date: snapshots.first().map(|s| s.date),
            last_date: snapshots.last().map(|s| s.date),
        };
        Ok((snapshots, report))
    }

    /// # Summary
    /// 执行一次完整运行：计算并写出全部输出。
    ///
    /// # Logic
    /// 1. 调用 `compute` 得到完整快照序列。
    /// 2. 依次写入各输出目标，任一失败即返回错误。
    ///
    /// # Returns
    /// 成功返回统计摘要。
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let (snapshots, report) = self.compute().await?;

        for sink in &self.sinks {
            sink.save_snapshots(&snapshots).await?;
            info!("Persisted breadth series to {}", sink.describe());
        }

        info!(
            "Pipeline finished: {} snapshots ({:?} .. {:?})",
            report.snapshots, report.first_date, report.last_date
        );
        Ok(report)
    }
}
