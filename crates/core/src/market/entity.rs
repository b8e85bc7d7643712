use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 单只证券单个交易日的日线记录，来自清洗后的 bhavcopy 主表。
///
/// # Invariants
/// - (`security_id`, `date`) 在整张输入表内唯一。
/// - 最高价、最低价、收盘价非空；开盘价、前收盘价、成交量与成交额在源文件中可能缺失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    // 证券代码 (例如: RELIANCE, INFY)
    pub security_id: String,
    // 交易日
    pub date: NaiveDate,
    // 开盘价
    pub open: Option<f64>,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 前收盘价
    pub prev_close: Option<f64>,
    // 成交量 (股)
    pub volume: Option<f64>,
    // 成交额 (十万卢比)
    pub turnover: Option<f64>,
}

/// # Summary
/// 附带滚动指标的日线记录，与输入记录一一对应。
///
/// # Invariants
/// - 所有指标只由同一证券按日期升序排列的历史观测计算，不跨证券取值。
/// - 历史长度不足窗口时对应指标为 `None`，而不是 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    // 原始日线
    pub daily: DailyRecord,
    // close / close[t-1] - 1
    pub pct_change_1d: Option<f64>,
    // close / close[t-5] - 1
    pub pct_change_5d: Option<f64>,
    // 20 日简单均线
    pub sma_20: Option<f64>,
    // 50 日简单均线
    pub sma_50: Option<f64>,
    // 200 日简单均线
    pub sma_200: Option<f64>,
    // 252 日滚动最高价
    pub high_52w: Option<f64>,
    // 252 日滚动最低价
    pub low_52w: Option<f64>,
    // high >= high_52w
    pub is_new_52w_high: Option<bool>,
    // low <= low_52w
    pub is_new_52w_low: Option<bool>,
    // 20 日平均成交量
    pub avg_volume_20: Option<f64>,
}

impl IndicatorRecord {
    /// 所属交易日。
    pub fn date(&self) -> NaiveDate {
        self.daily.date
    }

    /// 当日收盘价。
    pub fn close(&self) -> f64 {
        self.daily.close
    }
}
