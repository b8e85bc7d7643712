use breadth_core::breadth::entity::BreadthSnapshot;
use breadth_core::market::entity::IndicatorRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// 单日大涨阈值 (+4.5%)
pub const DAY_UP_THRESHOLD: f64 = 0.045;
/// 单日大跌阈值 (-4.5%)
pub const DAY_DOWN_THRESHOLD: f64 = -0.045;
/// 五日大涨阈值 (+20%)
pub const FIVE_DAY_UP_THRESHOLD: f64 = 0.20;
/// 五日大跌阈值 (-20%)
pub const FIVE_DAY_DOWN_THRESHOLD: f64 = -0.20;

/// # Summary
/// 单个交易日的横截面计数器。
///
/// # Invariants
/// - `total_traded` 统计当日全部行，其余计数只统计对应输入有定义的行。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DailyCounters {
    pub total_traded: u32,
    pub up_4_5_pct: u32,
    pub down_4_5_pct: u32,
    pub up_20_pct_5d: u32,
    pub down_20_pct_5d: u32,
    pub above_sma_200: u32,
    pub above_sma_50: u32,
    pub above_sma_20: u32,
    pub positive: u32,
    pub negative: u32,
    pub new_52w_highs: u32,
    pub new_52w_lows: u32,
}

fn meets(value: Option<f64>, predicate: impl Fn(f64) -> bool) -> u32 {
    u32::from(value.is_some_and(predicate))
}

impl DailyCounters {
    /// # Summary
    /// 将一行指标记录计入当日计数。
    ///
    /// # Logic
    /// 1. 总数无条件加一。
    /// 2. 指标缺失的比较一律视为不满足，不计数也不报错。
    pub fn observe(&mut self, row: &IndicatorRecord) {
        let close = row.close();

        self.total_traded += 1;
        self.up_4_5_pct += meets(row.pct_change_1d, |p| p >= DAY_UP_THRESHOLD);
        self.down_4_5_pct += meets(row.pct_change_1d, |p| p <= DAY_DOWN_THRESHOLD);
        self.up_20_pct_5d += meets(row.pct_change_5d, |p| p >= FIVE_DAY_UP_THRESHOLD);
        self.down_20_pct_5d += meets(row.pct_change_5d, |p| p <= FIVE_DAY_DOWN_THRESHOLD);
        self.above_sma_200 += meets(row.sma_200, |sma| close > sma);
        self.above_sma_50 += meets(row.sma_50, |sma| close > sma);
        self.above_sma_20 += meets(row.sma_20, |sma| close > sma);
        self.positive += meets(row.pct_change_1d, |p| p > 0.0);
        self.negative += meets(row.pct_change_1d, |p| p < 0.0);
        self.new_52w_highs += u32::from(row.is_new_52w_high.unwrap_or(false));
        self.new_52w_lows += u32::from(row.is_new_52w_low.unwrap_or(false));
    }

    /// 涨跌比；下跌家数为 0 时无定义。
    pub fn advance_decline_ratio(&self) -> Option<f64> {
        (self.negative > 0).then(|| f64::from(self.positive) / f64::from(self.negative))
    }

    pub fn net_new_highs(&self) -> i64 {
        i64::from(self.new_52w_highs) - i64::from(self.new_52w_lows)
    }

    /// 净新高占当日交易家数的百分比。
    pub fn net_new_highs_pct(&self) -> Option<f64> {
        (self.total_traded > 0).then(|| {
            (f64::from(self.new_52w_highs) - f64::from(self.new_52w_lows))
                / f64::from(self.total_traded)
                * 100.0
        })
    }

    /// 生成当日快照。
    pub fn into_snapshot(self, date: NaiveDate) -> BreadthSnapshot {
        BreadthSnapshot {
            date,
            total_traded: self.total_traded,
            up_4_5_pct: self.up_4_5_pct,
            down_4_5_pct: self.down_4_5_pct,
            up_20_pct_5d: self.up_20_pct_5d,
            down_20_pct_5d: self.down_20_pct_5d,
            above_sma_200: self.above_sma_200,
            above_sma_50: self.above_sma_50,
            above_sma_20: self.above_sma_20,
            positive: self.positive,
            negative: self.negative,
            new_52w_highs: self.new_52w_highs,
            new_52w_lows: self.new_52w_lows,
            advance_decline_ratio: self.advance_decline_ratio(),
            net_new_highs: self.net_new_highs(),
            net_new_highs_pct: self.net_new_highs_pct(),
        }
    }
}

/// # Summary
/// 聚合阶段入口：按交易日汇总全市场宽度。
///
/// # Logic
/// 1. 以日期为键分组（BTreeMap 保证升序）。
/// 2. 逐行累加各项计数。
/// 3. 截取 `display_from` 之后（包含）的交易日并派生比率。
///
/// # Arguments
/// * `rows`: 指标阶段输出的全部记录。
/// * `display_from`: 可选的输出窗口下界。
///
/// # Returns
/// 每个交易日一行、按日期升序的快照序列。
pub fn aggregate_breadth(
    rows: &[IndicatorRecord],
    display_from: Option<NaiveDate>,
) -> Vec<BreadthSnapshot> {
    let mut by_date: BTreeMap<NaiveDate, DailyCounters> = BTreeMap::new();
    for row in rows {
        by_date.entry(row.date()).or_default().observe(row);
    }
    debug!("Aggregating {} rows across {} dates", rows.len(), by_date.len());

    let snapshots: Vec<BreadthSnapshot> = match display_from {
        Some(from) => by_date
            .range(from..)
            .map(|(date, counters)| counters.into_snapshot(*date))
            .collect(),
        None => by_date
            .into_iter()
            .map(|(date, counters)| counters.into_snapshot(date))
            .collect(),
    };

    info!("Aggregated {} daily breadth snapshots", snapshots.len());
    snapshots
}
