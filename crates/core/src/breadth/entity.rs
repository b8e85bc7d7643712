use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 输出表的列名。看板按名称逐字匹配，包括历史遗留的 `stocs` 拼写。
pub mod columns {
    pub const DATE: &str = "Date";
    pub const TOTAL_TRADED: &str = "TotalTraded";
    pub const UP_4_5_PCT: &str = "No. of stocks up 4.5%+ in the current day";
    pub const DOWN_4_5_PCT: &str = "No. of stocs down 4.5%+ in the current day";
    pub const UP_20_PCT_5D: &str = "No. of stocks up 20%+ in 5 days";
    pub const DOWN_20_PCT_5D: &str = "No. of stocks down 20%+ in 5 days";
    pub const ABOVE_SMA_200: &str = "No of stocks above 200 day simple moving average";
    pub const ABOVE_SMA_50: &str = "No of stocks above 50 day simple moving average";
    pub const ABOVE_SMA_20: &str = "No of stocks above 20 day simple moving average";
    pub const POSITIVE: &str = "No of stocks which are positive";
    pub const NEGATIVE: &str = "No of stocks which are negative";
    pub const NEW_52W_HIGHS: &str = "New52W_Highs";
    pub const NEW_52W_LOWS: &str = "New52W_Lows";
    pub const ADVANCE_DECLINE_RATIO: &str = "Advance/Decline Ratio";
    pub const NET_NEW_HIGHS: &str = "Net New Highs";
    pub const NET_NEW_HIGHS_PCT: &str = "Net New 52-Week Highs as % of Total Stocks";

    /// 输出文件中的列顺序。
    pub const ALL: [&str; 16] = [
        DATE,
        TOTAL_TRADED,
        UP_4_5_PCT,
        DOWN_4_5_PCT,
        UP_20_PCT_5D,
        DOWN_20_PCT_5D,
        ABOVE_SMA_200,
        ABOVE_SMA_50,
        ABOVE_SMA_20,
        POSITIVE,
        NEGATIVE,
        NEW_52W_HIGHS,
        NEW_52W_LOWS,
        ADVANCE_DECLINE_RATIO,
        NET_NEW_HIGHS,
        NET_NEW_HIGHS_PCT,
    ];
}

/// # Summary
/// 单个交易日的全市场宽度快照。
///
/// # Invariants
/// - 每个交易日恰好一行，序列按日期升序。
/// - `positive + negative <= total_traded`。
/// - `net_new_highs == new_52w_highs - new_52w_lows`。
/// - `advance_decline_ratio` 在 `negative == 0` 时为 `None`，写出为 null。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadthSnapshot {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    // 当日有记录的证券数量
    #[serde(rename = "TotalTraded")]
    pub total_traded: u32,
    #[serde(rename = "No. of stocks up 4.5%+ in the current day")]
    pub up_4_5_pct: u32,
    #[serde(rename = "No. of stocs down 4.5%+ in the current day")]
    pub down_4_5_pct: u32,
    #[serde(rename = "No. of stocks up 20%+ in 5 days")]
    pub up_20_pct_5d: u32,
    #[serde(rename = "No. of stocks down 20%+ in 5 days")]
    pub down_20_pct_5d: u32,
    #[serde(rename = "No of stocks above 200 day simple moving average")]
    pub above_sma_200: u32,
    #[serde(rename = "No of stocks above 50 day simple moving average")]
    pub above_sma_50: u32,
    #[serde(rename = "No of stocks above 20 day simple moving average")]
    pub above_sma_20: u32,
    #[serde(rename = "No of stocks which are positive")]
    pub positive: u32,
    #[serde(rename = "No of stocks which are negative")]
    pub negative: u32,
    #[serde(rename = "New52W_Highs")]
    pub new_52w_highs: u32,
    #[serde(rename = "New52W_Lows")]
    pub new_52w_lows: u32,
    // positive / negative
    #[serde(rename = "Advance/Decline Ratio")]
    pub advance_decline_ratio: Option<f64>,
    #[serde(rename = "Net New Highs")]
    pub net_new_highs: i64,
    // net_new_highs / total_traded * 100
    #[serde(rename = "Net New 52-Week Highs as % of Total Stocks")]
    pub net_new_highs_pct: Option<f64>,
}
