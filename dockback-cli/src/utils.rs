use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;

/// 覆盖日志目录的环境变量
pub const LOG_DIR_ENV: &str = "DOCKBACK_LOG_DIR";

/// 设置日志记录系统
///
/// - 库代码只使用 tracing 宏记录日志，在应用入口配置输出
/// - 终端输出到 stderr，简洁格式
/// - 同时追加写入 `<日志目录>/dockback-<运行类型>.log`，包含模块路径与行号
/// - `RUST_LOG` 控制日志级别，`-v` 将默认级别切换为 debug
///
/// 返回的 guard 必须存活到程序结束，否则文件日志可能丢失。
/// 日志目录不可写时只输出到终端。
pub fn setup_logging(verbose: bool, run_type: &str, log_dir: &Path) -> Option<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false)
        .without_time()
        .compact();

    let log_dir = resolve_log_dir(log_dir);
    let log_file = log_file_path(&log_dir, run_type);
    let file = std::fs::create_dir_all(&log_dir).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
    });

    let (file_layer, guard, file_error) = match file {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("⚠️  无法写入日志文件 {}: {}，仅输出到终端", log_file.display(), e);
    }

    guard
}

fn resolve_log_dir(configured: &Path) -> PathBuf {
    std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| configured.to_path_buf())
}

/// 每种运行类型一个持久日志文件
pub fn log_file_path(log_dir: &Path, run_type: &str) -> PathBuf {
    log_dir.join(format!("dockback-{run_type}.log"))
}
