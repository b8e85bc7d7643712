use crate::window::{RollingMean, RollingWindow};
use breadth_core::market::entity::{DailyRecord, IndicatorRecord};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 单日涨跌幅的回看步数
pub const LAG_1D: usize = 1;
/// 五日涨跌幅的回看步数
pub const LAG_5D: usize = 5;
pub const SMA_SHORT: usize = 20;
pub const SMA_MID: usize = 50;
pub const SMA_LONG: usize = 200;
/// 52 周高低点窗口，约等于一年的交易日数
pub const WINDOW_52W: usize = 252;
pub const VOLUME_WINDOW: usize = 20;

/// # Summary
/// 计算 `current / base - 1`。
///
/// # Returns
/// 基准缺失、为 0 或非有限值时返回 None。
fn pct_change(current: f64, base: Option<f64>) -> Option<f64> {
    base.filter(|b| *b != 0.0 && b.is_finite())
        .map(|b| current / b - 1.0)
}

/// # Summary
/// 计算单只证券全部历史的滚动指标。
///
/// # Logic
/// 1. 按日期升序排列该证券的记录。
/// 2. 逐日将收盘价、最高价、最低价、成交量推入各自的滚动窗口。
/// 3. 窗口内观测值不足时对应指标保持为 None。
///
/// # Arguments
/// * `records`: 同一证券的全部日线，顺序不限。
///
/// # Returns
/// 与输入等长、按日期升序的指标记录。
pub fn compute_security(mut records: Vec<DailyRecord>) -> Vec<IndicatorRecord> {
    records.sort_by(|a, b| a.date.cmp(&b.date));

    let mut closes = RollingWindow::new(LAG_5D + 1);
    let mut sma_short = RollingMean::new(SMA_SHORT);
    let mut sma_mid = RollingMean::new(SMA_MID);
    let mut sma_long = RollingMean::new(SMA_LONG);
    let mut highs = RollingWindow::new(WINDOW_52W);
    let mut lows = RollingWindow::new(WINDOW_52W);
    let mut volumes = RollingWindow::new(VOLUME_WINDOW);

    records
        .into_iter()
        .map(|daily| {
            closes.push(daily.close);
            sma_short.push(daily.close);
            sma_mid.push(daily.close);
            sma_long.push(daily.close);
            highs.push(daily.high);
            lows.push(daily.low);
            volumes.push(daily.volume);

            let high_52w = highs.tail_max(WINDOW_52W);
            let low_52w = lows.tail_min(WINDOW_52W);

            IndicatorRecord {
                pct_change_1d: pct_change(daily.close, closes.lag(LAG_1D)),
                pct_change_5d: pct_change(daily.close, closes.lag(LAG_5D)),
                sma_20: sma_short.mean(),
                sma_50: sma_mid.mean(),
                sma_200: sma_long.mean(),
                // 窗口包含当日，持平历史最高也计为新高
                is_new_52w_high: high_52w.map(|h| daily.high >= h),
                is_new_52w_low: low_52w.map(|l| daily.low <= l),
                high_52w,
                low_52w,
                avg_volume_20: volumes.tail_mean(VOLUME_WINDOW),
                daily,
            }
        })
        .collect()
}

/// # Summary
/// 指标阶段入口：按证券分区并行计算滚动指标。
///
/// # Logic
/// 1. 按 `security_id` 分区（BTreeMap 保证分区顺序确定）。
/// 2. 各分区互不依赖，交给 rayon 线程池并行计算。
/// 3. 按分区顺序拼接，输出按 (security_id, date) 排序。
///
/// # Arguments
/// * `records`: 清洗后的全部日线记录。
///
/// # Returns
/// 与输入等长的指标记录表。
pub fn compute_indicators(records: Vec<DailyRecord>) -> Vec<IndicatorRecord> {
    let total = records.len();
    let mut partitions: BTreeMap<String, Vec<DailyRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry(record.security_id.clone())
            .or_default()
            .push(record);
    }

    info!(
        "Computing rolling indicators for {} securities ({} rows)",
        partitions.len(),
        total
    );

    let computed: Vec<Vec<IndicatorRecord>> = partitions
        .into_values()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(compute_security)
        .collect();

    let output: Vec<IndicatorRecord> = computed.into_iter().flatten().collect();
    debug!("Indicator stage produced {} rows", output.len());
    output
}
