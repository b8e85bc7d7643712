use crate::fs::write_atomically;
use async_trait::async_trait;
use breadth_core::breadth::entity::{BreadthSnapshot, columns};
use breadth_core::market::entity::DailyRecord;
use breadth_core::store::error::StoreError;
use breadth_core::store::port::{DailyRecordSource, SnapshotSink};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 清洗后日线主表的列名。
pub mod input_columns {
    pub const DATE: &str = "Date";
    pub const SYMBOL: &str = "Symbol";
    pub const OPEN: &str = "Open";
    pub const HIGH: &str = "High";
    pub const LOW: &str = "Low";
    pub const CLOSE: &str = "Close";
    pub const PREV_CLOSE: &str = "PrevClose";
    pub const VOLUME: &str = "Volume";
    pub const TURNOVER: &str = "Turnover";

    pub const REQUIRED: [&str; 9] = [
        DATE, SYMBOL, OPEN, HIGH, LOW, CLOSE, PREV_CLOSE, VOLUME, TURNOVER,
    ];
}

// 0001-01-01 到 1970-01-01 的天数，Polars 的 Date 以 Unix 纪元计
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn schema_error(column: &str) -> impl Fn(PolarsError) -> StoreError + '_ {
    move |e| StoreError::Schema(format!("column {column}: {e}"))
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, StoreError> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(schema_error(name))
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, StoreError> {
    let series = column(df, name)?
        .cast(&DataType::Float64)
        .map_err(schema_error(name))?;
    let values = series.f64().map_err(schema_error(name))?;
    Ok(values.into_iter().collect())
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, StoreError> {
    let series = column(df, name)?
        .cast(&DataType::String)
        .map_err(schema_error(name))?;
    let values = series.str().map_err(schema_error(name))?;
    Ok(values
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect())
}

fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>, StoreError> {
    let series = column(df, name)?
        .cast(&DataType::Date)
        .and_then(|s| s.cast(&DataType::Int32))
        .map_err(schema_error(name))?;
    let days = series.i32().map_err(schema_error(name))?;
    Ok(days
        .into_iter()
        .map(|d| {
            d.and_then(|d| d.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
                .and_then(NaiveDate::from_num_days_from_ce_opt)
        })
        .collect())
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, StoreError> {
    value.ok_or_else(|| StoreError::Schema(format!("column {column} is null at row {row}")))
}

/// # Summary
/// 将日线主表的 DataFrame 转为 `DailyRecord` 列表。
///
/// # Logic
/// 1. 检查必需列是否齐全，一次性报告所有缺失列。
/// 2. 逐列按约定类型取值（允许数值列为整数或字符串可转换的类型）。
/// 3. 代码与日期不允许为空，(Symbol, Date) 主键必须唯一。
/// 4. 最高价、最低价或收盘价为空的行跳过并计数告警，不中断整次运行。
/// 5. 开盘价、前收盘价、成交量与成交额允许为空。
///
/// # Arguments
/// * `df` - 输入表。
///
/// # Returns
/// * 记录列表或 `StoreError::Schema`。
pub fn records_from_frame(df: &DataFrame) -> Result<Vec<DailyRecord>, StoreError> {
    let missing: Vec<&str> = input_columns::REQUIRED
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::Schema(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let dates = date_values(df, input_columns::DATE)?;
    let symbols = string_values(df, input_columns::SYMBOL)?;
    let opens = f64_values(df, input_columns::OPEN)?;
    let highs = f64_values(df, input_columns::HIGH)?;
    let lows = f64_values(df, input_columns::LOW)?;
    let closes = f64_values(df, input_columns::CLOSE)?;
    let prev_closes = f64_values(df, input_columns::PREV_CLOSE)?;
    let volumes = f64_values(df, input_columns::VOLUME)?;
    let turnovers = f64_values(df, input_columns::TURNOVER)?;

    let mut seen: HashSet<(String, NaiveDate)> = HashSet::with_capacity(df.height());
    let mut records = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for row in 0..df.height() {
        let security_id = required(symbols[row].clone(), input_columns::SYMBOL, row)?;
        let date = required(dates[row], input_columns::DATE, row)?;
        if !seen.insert((security_id.clone(), date)) {
            return Err(StoreError::Schema(format!(
                "duplicate key ({security_id}, {date}) at row {row}"
            )));
        }

        let (Some(high), Some(low), Some(close)) = (highs[row], lows[row], closes[row]) else {
            debug!("Skipping {security_id} on {date}: missing high/low/close");
            skipped += 1;
            continue;
        };

        records.push(DailyRecord {
            security_id,
            date,
            open: opens[row],
            high,
            low,
            close,
            prev_close: prev_closes[row],
            volume: volumes[row],
            turnover: turnovers[row],
        });
    }

    if skipped > 0 {
        warn!("Skipped {skipped} rows with missing high/low/close prices");
    }
    Ok(records)
}

/// # Summary
/// 将快照序列转为输出 DataFrame，列名与列顺序遵循 `columns::ALL`。
pub fn frame_from_snapshots(snapshots: &[BreadthSnapshot]) -> Result<DataFrame, StoreError> {
    fn counts(
        snapshots: &[BreadthSnapshot],
        name: &str,
        field: fn(&BreadthSnapshot) -> u32,
    ) -> Column {
        Column::from(Series::new(
            name.into(),
            snapshots.iter().map(field).collect::<Vec<u32>>(),
        ))
    }

    let days: Vec<i32> = snapshots
        .iter()
        .map(|s| s.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    let dates = Series::new(columns::DATE.into(), days)
        .cast(&DataType::Date)
        .map_err(|e| StoreError::Encode(e.to_string()))?;

    let frame = DataFrame::new(vec![
        Column::from(dates),
        counts(snapshots, columns::TOTAL_TRADED, |s| s.total_traded),
        counts(snapshots, columns::UP_4_5_PCT, |s| s.up_4_5_pct),
        counts(snapshots, columns::DOWN_4_5_PCT, |s| s.down_4_5_pct),
        counts(snapshots, columns::UP_20_PCT_5D, |s| s.up_20_pct_5d),
        counts(snapshots, columns::DOWN_20_PCT_5D, |s| s.down_20_pct_5d),
        counts(snapshots, columns::ABOVE_SMA_200, |s| s.above_sma_200),
        counts(snapshots, columns::ABOVE_SMA_50, |s| s.above_sma_50),
        counts(snapshots, columns::ABOVE_SMA_20, |s| s.above_sma_20),
        counts(snapshots, columns::POSITIVE, |s| s.positive),
        counts(snapshots, columns::NEGATIVE, |s| s.negative),
        counts(snapshots, columns::NEW_52W_HIGHS, |s| s.new_52w_highs),
        counts(snapshots, columns::NEW_52W_LOWS, |s| s.new_52w_lows),
        Column::from(Series::new(
            columns::ADVANCE_DECLINE_RATIO.into(),
            snapshots
                .iter()
                .map(|s| s.advance_decline_ratio)
                .collect::<Vec<Option<f64>>>(),
        )),
        Column::from(Series::new(
            columns::NET_NEW_HIGHS.into(),
            snapshots
                .iter()
                .map(|s| s.net_new_highs)
                .collect::<Vec<i64>>(),
        )),
        Column::from(Series::new(
            columns::NET_NEW_HIGHS_PCT.into(),
            snapshots
                .iter()
                .map(|s| s.net_new_highs_pct)
                .collect::<Vec<Option<f64>>>(),
        )),
    ])
    .map_err(|e| StoreError::Encode(e.to_string()))?;

    Ok(frame)
}

fn read_records(path: &Path) -> Result<Vec<DailyRecord>, StoreError> {
    if !path.is_file() {
        return Err(StoreError::MissingInput(path.display().to_string()));
    }
    let file = File::open(path)?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| StoreError::Io(format!("{}: {}", path.display(), e)))?;
    debug!("Read {} rows x {} columns from {}", df.height(), df.width(), path.display());
    records_from_frame(&df)
}

/// # Summary
/// 基于 Parquet 文件的日线主表数据源。
///
/// # Invariants
/// * 文件由上游清洗流程生成，每次运行完整读取。
pub struct ParquetRecordSource {
    path: PathBuf,
}

impl ParquetRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DailyRecordSource for ParquetRecordSource {
    /// # Summary
    /// 读取并校验日线主表。
    ///
    /// # Logic
    /// 1. 在阻塞线程池中读取 Parquet（Polars 为同步 IO）。
    /// 2. 校验并转换为 `DailyRecord`。
    async fn load_records(&self) -> Result<Vec<DailyRecord>, StoreError> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || read_records(&path))
            .await
            .map_err(|e| StoreError::Io(e.to_string()))??;
        info!("Loaded {} daily records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// # Summary
/// 看板读取的 Parquet 快照输出。
///
/// # Invariants
/// * 每次写入整体替换目标文件。
pub struct ParquetSnapshotSink {
    path: PathBuf,
}

impl ParquetSnapshotSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSink for ParquetSnapshotSink {
    fn describe(&self) -> String {
        format!("parquet:{}", self.path.display())
    }

    async fn save_snapshots(&self, snapshots: &[BreadthSnapshot]) -> Result<(), StoreError> {
        let mut frame = frame_from_snapshots(snapshots)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            write_atomically(&path, |file| {
                ParquetWriter::new(file)
                    .finish(&mut frame)
                    .map(|_| ())
                    .map_err(|e| StoreError::Encode(e.to_string()))
            })
        })
        .await
        .map_err(|e| StoreError::Io(e.to_string()))??;

        info!("Wrote {} snapshots to {}", snapshots.len(), self.path.display());
        Ok(())
    }
}
