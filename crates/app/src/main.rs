use std::sync::Arc;

use breadth_core::config::{AppConfig, LogConfig};
use breadth_core::store::port::SnapshotSink;
use breadth_pipeline::BreadthPipeline;
use breadth_store::config::DataPaths;
use breadth_store::json::JsonSnapshotSink;
use breadth_store::parquet::{ParquetRecordSource, ParquetSnapshotSink};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// 可选的配置文件（不含扩展名），以及环境变量前缀
const CONFIG_FILE: &str = "config/breadth";
const ENV_PREFIX: &str = "BREADTH";

/// 按 默认值 → 配置文件 → 环境变量 的顺序合并配置。
fn load_config() -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// # Summary
/// 初始化全局日志。
///
/// # Logic
/// 1. 过滤级别优先取 `RUST_LOG`，否则取配置中的级别。
/// 2. 始终输出到标准输出；配置了日志目录时额外按天滚动写文件。
///
/// # Returns
/// 文件写入线程的守卫，须在进程生命周期内持有。
fn init_tracing(log: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let (file_layer, guard) = match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "breadth.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责实例化数据源与输出目标，并通过 Arc<dyn Trait> 注入到 BreadthPipeline。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 按配置设置 rayon 全局线程池。
/// 3. 实例化基础设施层（Parquet 数据源、Parquet 与 JSON 输出）。
/// 4. 构造流水线并执行一次完整运行，失败时以非零状态退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置与日志
    let app_config = load_config()?;
    let _guard = init_tracing(&app_config.log);
    info!("Market breadth pipeline starting...");

    // 2. 计算线程池
    if let Some(threads) = app_config.pipeline.worker_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        info!("Indicator stage limited to {threads} worker threads");
    }

    // 3. 实例化基础设施层
    let paths = DataPaths::from_config(&app_config.data);
    let source = Arc::new(ParquetRecordSource::new(paths.input.clone()));
    let sinks: Vec<Arc<dyn SnapshotSink>> = vec![
        Arc::new(ParquetSnapshotSink::new(paths.metrics.clone())),
        Arc::new(JsonSnapshotSink::new(paths.json.clone())),
    ];

    // 4. 构造应用服务层并运行
    let pipeline =
        BreadthPipeline::new(source, sinks).with_display_from(app_config.pipeline.display_from);
    let report = pipeline.run().await?;

    info!(
        "Done: {} rows from {} securities -> {} daily snapshots",
        report.input_rows, report.securities, report.snapshots
    );
    Ok(())
}
