use breadth_core::config::DataConfig;
use std::path::{Path, PathBuf};

/// # Summary
/// 流水线读写的物理文件路径。
///
/// # Invariants
/// - 相对文件名以 `data_dir` 为根解析，绝对路径原样保留。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    // 清洗后的日线主表
    pub input: PathBuf,
    // 看板读取的 Parquet 输出
    pub metrics: PathBuf,
    // 行式 JSON 导出
    pub json: PathBuf,
}

impl DataPaths {
    /// # Summary
    /// 根据数据配置解析各文件路径。
    ///
    /// # Arguments
    /// * `config` - 数据目录与文件名配置。
    ///
    /// # Returns
    /// * 解析后的路径集合。
    pub fn from_config(config: &DataConfig) -> Self {
        let root = PathBuf::from(&config.data_dir);
        Self {
            input: resolve(&root, &config.input_file),
            metrics: resolve(&root, &config.metrics_file),
            json: resolve(&root, &config.json_file),
        }
    }
}

fn resolve(root: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_files_resolve_under_data_dir() {
        let paths = DataPaths::from_config(&DataConfig::default());
        assert_eq!(paths.input, PathBuf::from("data").join("master_bhavcopy.parquet"));
        assert_eq!(
            paths.metrics,
            PathBuf::from("data").join("market_breadth_metrics.parquet")
        );
        assert_eq!(paths.json, PathBuf::from("data").join("market_breadth.json"));
    }

    #[test]
    fn test_absolute_file_is_kept() {
        let absolute = std::env::temp_dir().join("bhav.parquet");
        let config = DataConfig {
            input_file: absolute.to_string_lossy().into_owned(),
            ..DataConfig::default()
        };
        assert_eq!(DataPaths::from_config(&config).input, absolute);
    }
}
