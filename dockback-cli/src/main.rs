use clap::Parser;
use dockback_cli::{Cli, CliApp, Commands, load_config, run_init, setup_logging};
use dockback_core::DockbackError;
use dockback_core::constants::config::DEFAULT_LOG_DIR;
use std::path::PathBuf;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;

/// 退出前释放 guard，确保文件日志写完
fn exit_failure(guard: Option<WorkerGuard>) -> ! {
    drop(guard);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    // 解析命令行参数
    let cli = Cli::parse();
    let run_type = cli.command.run_type();

    // `init` 命令是特例，它不需要预先加载配置
    if let Commands::Init { force } = cli.command {
        let guard = setup_logging(cli.verbose, run_type, &PathBuf::from(DEFAULT_LOG_DIR));
        if let Err(e) = run_init(cli.config.as_deref(), force).await {
            error!("❌ 初始化失败: {}", e);
            exit_failure(guard);
        }
        return;
    }

    // 先加载配置以确定日志目录，加载失败时使用默认目录记录错误
    let config = load_config(cli.config.as_deref());
    let log_dir = config
        .as_ref()
        .map(|c| c.log.dir.clone())
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_DIR));
    let guard = setup_logging(cli.verbose, run_type, &log_dir);

    let config = match config {
        Ok(config) => config,
        Err(DockbackError::ConfigNotFound) => {
            match &cli.config {
                Some(path) => error!("❌ 配置文件 '{}' 未找到。", path.display()),
                None => error!("❌ 未找到配置文件 (dockback.toml / .dockback.toml / /etc/dockback/dockback.toml)。"),
            }
            error!("👉 请先运行 'dockback init' 命令来创建配置文件。");
            exit_failure(guard);
        }
        Err(e) => {
            error!("❌ 加载配置失败: {}", e);
            exit_failure(guard);
        }
    };

    let app = match CliApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 应用初始化失败: {:#}", e);
            exit_failure(guard);
        }
    };

    // 运行命令；部分容器失败只输出警告，不影响退出码
    if let Err(e) = app.run_command(cli.command).await {
        error!("❌ 操作失败: {:#}", e);
        exit_failure(guard);
    }
}
