use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub pipeline: PipelineConfig,
    pub log: LogConfig,
}

/// 输入输出文件位置。相对文件名以 `data_dir` 为根解析。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: String,
    // 清洗后的日线主表
    pub input_file: String,
    // 看板读取的列式输出
    pub metrics_file: String,
    // 行式 JSON 导出
    pub json_file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // 输出窗口的起始日期（包含），None 表示输出全部历史
    pub display_from: Option<NaiveDate>,
    // 指标计算线程数，None 使用 rayon 默认值
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    // 设置后额外按天滚动写入该目录
    pub dir: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            input_file: "master_bhavcopy.parquet".to_string(),
            metrics_file: "market_breadth_metrics.parquet".to_string(),
            json_file: "market_breadth.json".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.data.data_dir, "data");
        assert_eq!(config.data.input_file, "master_bhavcopy.parquet");
        assert_eq!(config.data.metrics_file, "market_breadth_metrics.parquet");
        assert_eq!(config.data.json_file, "market_breadth.json");
        assert!(config.pipeline.display_from.is_none());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"pipeline": {"display_from": "2023-01-01"}}"#).unwrap();
        assert_eq!(
            config.pipeline.display_from,
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
        assert_eq!(config.data.data_dir, "data");
        assert_eq!(config.log.level, "info");
    }
}
