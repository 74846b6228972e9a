use crate::app::CliApp;
use anyhow::Result;
use dockback_core::graceful::{self, StateStore, policy};
use tracing::{info, warn};

/// 停机所有带标记的容器
///
/// 单个容器失败不视为致命错误，汇总后以警告输出。
pub async fn run_graceful_stop(app: &CliApp) -> Result<()> {
    app.docker.check_docker_status().await?;

    let settings = &app.config.graceful;
    let containers = graceful::discover(&app.docker, &settings.marker_label).await?;
    if containers.is_empty() {
        info!("没有带 {}=true 标记的容器", settings.marker_label);
    }

    let result = app
        .backup_manager
        .orchestrator()
        .prepare(containers, settings.default_timeout)
        .await?;

    info!("✅ 已停机 {} 个容器", result.prepared_count);
    if !result.is_clean() {
        warn!(
            "⚠️  以下容器停机失败（已记录，恢复时仍会处理）: {}",
            result.failed_containers.join(", ")
        );
    }
    Ok(())
}

/// 按状态文件恢复容器
pub async fn run_graceful_start(app: &CliApp) -> Result<()> {
    app.docker.check_docker_status().await?;

    let result = app.backup_manager.orchestrator().resume().await?;

    info!("✅ 已恢复 {} 个容器", result.restored_count);
    if !result.is_clean() {
        warn!(
            "⚠️  以下容器恢复失败，请手动检查: {}",
            result.failed_containers.join(", ")
        );
    }
    Ok(())
}

/// 列出带标记的容器及解析后的策略，不改动任何容器
pub async fn run_graceful_list(app: &CliApp) -> Result<()> {
    let settings = &app.config.graceful;
    let containers = graceful::discover(&app.docker, &settings.marker_label).await?;

    info!("📋 带 {}=true 标记的容器 ({} 个):", settings.marker_label, containers.len());
    for container in &containers {
        let policy = policy::resolve(container, settings.default_timeout);
        let compose = container
            .compose
            .as_ref()
            .map(|c| format!("{}/{}", c.project, c.service))
            .unwrap_or_else(|| "-".to_string());

        info!(
            "   - {} | 方式: {} | 超时: {}s | 运行中: {} | compose: {}",
            container.name,
            policy.method,
            policy.timeout_secs,
            if container.is_running { "是" } else { "否" },
            compose
        );
        if let Some(pre) = &policy.pre_command {
            info!("       pre:  {}", pre);
        }
        if let Some(post) = &policy.post_command {
            info!("       post: {}", post);
        }
    }

    let orchestrator = app.backup_manager.orchestrator();
    match orchestrator.store().load() {
        Ok(records) if !records.is_empty() => {
            warn!(
                "⚠️  状态文件中有 {} 条待恢复记录，请运行 'dockback graceful start'",
                records.len()
            );
            for record in &records {
                info!(
                    "   - {} ({}，停机前{})",
                    record.container_name,
                    record.policy.method,
                    if record.was_running { "运行中" } else { "未运行" }
                );
            }
        }
        Ok(_) => {}
        Err(e) => warn!("读取状态文件失败: {}", e),
    }
    Ok(())
}
