use crate::project_info::get_version_string;
use dockback_core::{config::AppConfig, constants::config, error::Result};
use std::path::Path;
use tracing::{info, warn};

/// 生成默认配置文件
pub async fn run_init(path: Option<&Path>, force: bool) -> Result<()> {
    info!("🐳 {} 初始化", get_version_string());
    info!("======================");

    let default_path = config::get_default_config_path();
    let path = path.unwrap_or(default_path.as_path());

    if path.exists() && !force {
        warn!("⚠️  配置文件已存在: {}", path.display());
        info!("如果您要重新初始化，请使用 --force 参数");
        info!("示例: dockback init --force");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let config = AppConfig::default();
    config.save_to_file(path)?;
    info!("   ✅ 创建配置文件: {}", path.display());

    info!("🎉 初始化完成！");
    info!("");
    info!("📝 接下来的步骤:");
    info!("   1️⃣  编辑 {}，设置 [remote] target（例如 rclone 远程 \"b2:my-bucket\"）", path.display());
    info!("   2️⃣  为需要停机备份的容器添加标签 dockback.graceful=true");
    info!("   3️⃣  运行 'dockback graceful list' 检查停机策略");
    info!("   4️⃣  运行 'dockback backup all' 执行首次备份");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_writes_loadable_template() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("etc/dockback.toml");

        run_init(Some(&path), false).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[graceful]"));

        // 模板中 target 为空，需用户填写后才能通过校验
        let edited = content.replace("target = \"\"", "target = \"b2:backups\"");
        std::fs::write(&path, edited).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.remote.target, "b2:backups");
    }

    #[tokio::test]
    async fn test_init_keeps_existing_file_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockback.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        run_init(Some(&path), false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        run_init(Some(&path), true).await.unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
