use crate::app::CliApp;
use crate::cli::BackupClass;
use anyhow::Result;
use dockback_core::backup::BackupSummary;
use dockback_core::retention;
use dockback_core::volume;
use tracing::{error, info, warn};

/// 备份所有 Docker 卷
pub async fn run_backup_volumes(app: &CliApp) -> Result<()> {
    info!("💾 备份 Docker 卷");
    info!("===============");

    app.docker.check_docker_status().await?;
    app.storage.check_available().await?;

    let summary = app.backup_manager.backup_volumes().await?;
    report_summary(&summary);
    Ok(())
}

/// 备份 compose 项目目录
pub async fn run_backup_stacks(app: &CliApp) -> Result<()> {
    info!("💾 备份 compose 项目目录");
    info!("=======================");

    app.storage.check_available().await?;

    let summary = app.backup_manager.backup_stacks().await?;
    report_summary(&summary);
    Ok(())
}

fn report_summary(summary: &BackupSummary) {
    if let Some(prepare) = &summary.prepare {
        info!("⏸️  停机容器: {}", prepare.prepared_count);
        if !prepare.is_clean() {
            warn!("⚠️  停机失败: {}", prepare.failed_containers.join(", "));
        }
    }
    if let Some(resume) = &summary.resume {
        info!("▶️  恢复容器: {}", resume.restored_count);
        if !resume.is_clean() {
            error!("❌ 恢复失败，请手动检查: {}", resume.failed_containers.join(", "));
        }
    }

    info!(
        "📊 {} 批次 {}: 上传 {} 个，失败 {} 个，清理过期批次 {} 个",
        summary.class,
        summary.timestamp,
        summary.uploaded.len(),
        summary.failed.len(),
        summary.pruned.len()
    );
    if !summary.failed.is_empty() {
        warn!("⚠️  失败项: {}", summary.failed.join(", "));
    }

    if summary.is_clean() {
        info!("✅ 备份完成");
    } else {
        warn!("⚠️  备份完成，但存在部分失败");
    }
}

/// 列出远程备份批次
pub async fn run_list_backups(app: &CliApp, class: BackupClass) -> Result<()> {
    let runs = app.backup_manager.list_backups(class.as_str()).await?;

    if runs.is_empty() {
        info!("📦 {} 暂无备份", class.as_str());
        info!("💡 使用 'dockback backup {}' 创建备份", class.as_str());
        return Ok(());
    }

    info!("📦 {} 备份批次 ({} 个，从新到旧):", class.as_str(), runs.len());
    for run in &runs {
        info!(
            "   {} | {} 项 | {}",
            retention::format_timestamp(&run.timestamp),
            run.archives.len(),
            run.archives.join(", ")
        );
    }
    Ok(())
}

/// 按保留数量清理过期备份
pub async fn run_prune(app: &CliApp, class: Option<BackupClass>) -> Result<()> {
    app.storage.check_available().await?;

    let classes = match class {
        Some(class) => vec![class],
        None => vec![BackupClass::Volumes, BackupClass::Stacks],
    };

    for class in classes {
        let keep = app.config.keep_for_class(class.as_str());
        let deleted = app.backup_manager.prune(class.as_str()).await?;
        info!(
            "🧹 {}: 保留最新 {} 个，删除 {} 个",
            class.as_str(),
            keep,
            deleted.len()
        );
    }
    Ok(())
}

/// 列出本机卷与备份时使用的名称
pub async fn run_list_volumes(app: &CliApp) -> Result<()> {
    app.docker.check_docker_status().await?;

    let volumes = volume::discover_volumes(&app.docker).await?;
    info!("🗂️  本机卷 ({} 个):", volumes.len());
    for v in &volumes {
        let excluded = v.is_excluded(&app.config.backup.exclude_volumes);
        info!(
            "   {} -> {}{} | 容器: {}",
            v.volume_id,
            v.meaningful_name,
            if excluded { " (已排除)" } else { "" },
            if v.attached_containers.is_empty() {
                "-".to_string()
            } else {
                v.attached_containers.join(", ")
            }
        );
    }
    Ok(())
}
