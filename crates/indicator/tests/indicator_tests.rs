use breadth_core::market::entity::{DailyRecord, IndicatorRecord};
use breadth_indicator::{compute_indicators, compute_security};
use chrono::{Days, NaiveDate};

fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap() + Days::new(offset)
}

fn record(symbol: &str, offset: u64, close: f64) -> DailyRecord {
    DailyRecord {
        security_id: symbol.to_string(),
        date: day(offset),
        open: Some(close),
        high: close + 1.0,
        low: close - 1.0,
        close,
        prev_close: Some(close),
        volume: Some(1000.0),
        turnover: Some(10.0),
    }
}

fn series(symbol: &str, closes: &[f64]) -> Vec<DailyRecord> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| record(symbol, i as u64, *c))
        .collect()
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value should be defined");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_sma_20_undefined_with_19_observations() {
    let closes: Vec<f64> = (1..=19).map(f64::from).collect();
    let out = compute_security(series("AAA", &closes));
    assert_eq!(out.len(), 19);
    assert!(out.iter().all(|r| r.sma_20.is_none()));
}

#[test]
fn test_sma_20_defined_once_with_20_observations() {
    let closes: Vec<f64> = (1..=20).map(f64::from).collect();
    let out = compute_security(series("AAA", &closes));
    let defined: Vec<&IndicatorRecord> = out.iter().filter(|r| r.sma_20.is_some()).collect();
    assert_eq!(defined.len(), 1);
    assert_eq!(defined[0].date(), day(19));
    // 1..=20 的均值
    assert_close(defined[0].sma_20, 10.5);
    assert!(out.iter().all(|r| r.sma_50.is_none() && r.sma_200.is_none()));
}

#[test]
fn test_sma_200_first_defined_at_200th_observation() {
    let closes: Vec<f64> = (1..=200).map(f64::from).collect();
    let out = compute_security(series("AAA", &closes));
    assert!(out[198].sma_200.is_none());
    // 1..=200 的均值
    assert_close(out[199].sma_200, 100.5);
}

#[test]
fn test_sma_tracks_trailing_window() {
    // 带周期波动，避免单调序列掩盖窗口错位
    let closes: Vec<f64> = (0..220)
        .map(|i| 100.0 + f64::from(i) * 0.5 + f64::from(i % 7) * 3.0)
        .collect();
    let out = compute_security(series("AAA", &closes));

    for (t, row) in out.iter().enumerate() {
        if t < 19 {
            assert!(row.sma_20.is_none());
        } else {
            let expected = closes[t + 1 - 20..=t].iter().sum::<f64>() / 20.0;
            assert_close(row.sma_20, expected);
        }
        if t < 49 {
            assert!(row.sma_50.is_none());
        } else {
            let expected = closes[t + 1 - 50..=t].iter().sum::<f64>() / 50.0;
            assert_close(row.sma_50, expected);
        }
        if t < 199 {
            assert!(row.sma_200.is_none());
        } else {
            let expected = closes[t + 1 - 200..=t].iter().sum::<f64>() / 200.0;
            assert_close(row.sma_200, expected);
        }
    }
}

#[test]
fn test_pct_change_uses_lagged_close() {
    let closes = [100.0, 110.0, 99.0, 99.0, 120.0, 150.0, 75.0];
    let out = compute_security(series("AAA", &closes));

    assert!(out[0].pct_change_1d.is_none());
    assert_close(out[1].pct_change_1d, 0.1);
    assert_close(out[2].pct_change_1d, 99.0 / 110.0 - 1.0);
    assert_close(out[3].pct_change_1d, 0.0);

    for row in &out[..5] {
        assert!(row.pct_change_5d.is_none());
    }
    assert_close(out[5].pct_change_5d, 0.5);
    assert_close(out[6].pct_change_5d, 75.0 / 110.0 - 1.0);
}

#[test]
fn test_zero_base_close_is_undefined() {
    let out = compute_security(series("AAA", &[0.0, 5.0]));
    assert!(out[1].pct_change_1d.is_none());
}

#[test]
fn test_unsorted_input_is_ordered_by_date() {
    let mut records = series("AAA", &[10.0, 11.0, 12.0]);
    records.reverse();
    let out = compute_security(records);
    let dates: Vec<NaiveDate> = out.iter().map(|r| r.date()).collect();
    assert_eq!(dates, vec![day(0), day(1), day(2)]);
    assert_close(out[2].pct_change_1d, 12.0 / 11.0 - 1.0);
}

#[test]
fn test_52_week_extremes_need_full_window() {
    let closes: Vec<f64> = (0..253).map(|i| 50.0 + f64::from(i)).collect();
    let out = compute_security(series("AAA", &closes));

    assert!(out[250].high_52w.is_none());
    assert!(out[250].is_new_52w_high.is_none());

    // 第 252 个观测值起有定义，窗口包含当日
    assert_close(out[251].high_52w, 50.0 + 251.0 + 1.0);
    assert_close(out[251].low_52w, 50.0 - 1.0);
    assert_eq!(out[251].is_new_52w_high, Some(true));
    assert_eq!(out[251].is_new_52w_low, Some(false));

    assert_close(out[252].low_52w, 51.0 - 1.0);
}

#[test]
fn test_tie_with_rolling_max_counts_as_new_high() {
    let mut closes: Vec<f64> = vec![100.0; 252];
    closes.push(100.0);
    let out = compute_security(series("AAA", &closes));
    assert_eq!(out[251].is_new_52w_high, Some(true));
    assert_eq!(out[252].is_new_52w_high, Some(true));
    assert_eq!(out[252].is_new_52w_low, Some(true));
}

#[test]
fn test_avg_volume_skips_incomplete_windows() {
    let mut records = series("AAA", &[10.0; 25]);
    records[3].volume = None;
    let out = compute_security(records);
    // 下标 19..=22 的窗口都覆盖第 3 行的缺失成交量
    assert!(out[19].avg_volume_20.is_none());
    assert!(out[22].avg_volume_20.is_none());
    assert_close(out[23].avg_volume_20, 1000.0);
}

#[test]
fn test_partitions_do_not_leak_between_securities() {
    let mut records = series("AAA", &[10.0, 20.0]);
    records.extend(series("BBB", &[100.0, 50.0]));
    // 交错输入顺序
    records.swap(1, 2);

    let out = compute_indicators(records);
    assert_eq!(out.len(), 4);

    let keys: Vec<(&str, NaiveDate)> = out
        .iter()
        .map(|r| (r.daily.security_id.as_str(), r.date()))
        .collect();
    assert_eq!(
        keys,
        vec![("AAA", day(0)), ("AAA", day(1)), ("BBB", day(0)), ("BBB", day(1))]
    );

    assert!(out[0].pct_change_1d.is_none());
    assert_close(out[1].pct_change_1d, 1.0);
    assert!(out[2].pct_change_1d.is_none());
    assert_close(out[3].pct_change_1d, -0.5);
}

#[test]
fn test_compute_is_deterministic() {
    let mut records = Vec::new();
    for (symbol, base) in [("AAA", 1.0), ("BBB", 4.0), ("CCC", 7.0), ("DDD", 10.0)] {
        let closes: Vec<f64> = (0..30).map(|t| base + f64::from(t)).collect();
        records.extend(series(symbol, &closes));
    }
    let first = compute_indicators(records.clone());
    let second = compute_indicators(records);
    assert_eq!(first, second);
}
