use crate::app::CliApp;
use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

/// 从远程恢复一个卷
pub async fn run_restore_volume(
    app: &CliApp,
    name: &str,
    timestamp: Option<&str>,
    target: Option<&Path>,
    force: bool,
) -> Result<()> {
    app.storage.check_available().await?;
    if target.is_none() {
        // 未指定目录时需要通过 docker 查找卷挂载点
        app.docker.check_docker_status().await?;
    }

    warn!("⚠️  恢复前请确认使用该卷的容器已停止");
    let restored = app
        .backup_manager
        .restore_volume(name, timestamp, target, force)
        .await?;

    info!("🎉 恢复完成: {}", restored.display());
    Ok(())
}

/// 从远程恢复一个 compose 项目目录
pub async fn run_restore_stack(
    app: &CliApp,
    name: &str,
    timestamp: Option<&str>,
    force: bool,
) -> Result<()> {
    app.storage.check_available().await?;

    let restored = app.backup_manager.restore_stack(name, timestamp, force).await?;

    info!("🎉 恢复完成: {}", restored.display());
    info!("💡 使用 'docker compose up -d' 在 {} 中启动服务", restored.display());
    Ok(())
}
