use crate::constants::{backup, config, graceful};
use crate::error::{DockbackError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 应用配置结构
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub graceful: GracefulConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 优雅停机配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GracefulConfig {
    pub enabled: bool,
    pub marker_label: String,
    pub default_timeout: u64,
    pub state_file: PathBuf,
    pub settle_delay_secs: u64,
}

/// 备份相关配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BackupConfig {
    pub volumes_dir: PathBuf,
    pub stacks_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub compression_level: u32,
    pub keep_volumes: u32,
    pub keep_stacks: u32,
    /// 按有意义名称或卷 ID 排除的卷
    pub exclude_volumes: Vec<String>,
}

/// 远程存储类型
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    #[default]
    Rclone,
    Local,
}

/// 远程存储配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RemoteConfig {
    pub kind: RemoteKind,
    /// rclone 远程名（如 `b2:`）或本地目录
    pub target: String,
    pub base_path: String,
    /// 多服务器共用同一远程时用于区分命名空间
    pub server_id: Option<String>,
}

/// 日志配置
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub dir: PathBuf,
}

impl Default for GracefulConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            marker_label: crate::constants::labels::GRACEFUL_MARKER.to_string(),
            default_timeout: graceful::DEFAULT_TIMEOUT_SECS,
            state_file: PathBuf::from(graceful::DEFAULT_STATE_FILE),
            settle_delay_secs: graceful::POST_COMMAND_SETTLE_SECS,
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            volumes_dir: PathBuf::from(backup::DEFAULT_VOLUMES_DIR),
            stacks_dir: PathBuf::from(backup::DEFAULT_STACKS_DIR),
            staging_dir: PathBuf::from(backup::DEFAULT_STAGING_DIR),
            compression_level: backup::DEFAULT_COMPRESSION_LEVEL,
            keep_volumes: backup::DEFAULT_KEEP,
            keep_stacks: backup::DEFAULT_KEEP,
            exclude_volumes: Vec::new(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            kind: RemoteKind::Rclone,
            target: String::new(),
            base_path: backup::DEFAULT_BASE_PATH.to_string(),
            server_id: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(config::DEFAULT_LOG_DIR),
        }
    }
}

impl AppConfig {
    /// 智能查找并加载配置文件
    /// 按优先级查找：dockback.toml -> .dockback.toml -> /etc/dockback/dockback.toml
    pub fn find_and_load_config() -> Result<Self> {
        for config_file in &config::CONFIG_FILE_CANDIDATES {
            if Path::new(config_file).exists() {
                tracing::info!("找到配置文件: {}", config_file);
                return Self::load_from_file(config_file);
            }
        }

        Err(DockbackError::ConfigNotFound)
    }

    /// 从指定文件加载并校验配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DockbackError::ConfigNotFound);
        }

        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_with_comments();
        fs::write(&path, content)?;
        Ok(())
    }

    /// 校验取值范围，保留数必须至少为 1
    pub fn validate(&self) -> Result<()> {
        if self.graceful.default_timeout == 0 {
            return Err(DockbackError::invalid_config(
                "graceful.default_timeout 必须大于 0",
            ));
        }
        if self.backup.keep_volumes < 1 {
            return Err(DockbackError::invalid_config(
                "backup.keep_volumes 必须至少为 1",
            ));
        }
        if self.backup.keep_stacks < 1 {
            return Err(DockbackError::invalid_config(
                "backup.keep_stacks 必须至少为 1",
            ));
        }
        if self.backup.compression_level > 9 {
            return Err(DockbackError::invalid_config(format!(
                "backup.compression_level 必须在 0-9 之间，当前为 {}",
                self.backup.compression_level
            )));
        }
        if self.remote.target.trim().is_empty() {
            return Err(DockbackError::invalid_config("remote.target 不能为空"));
        }
        Ok(())
    }

    /// 获取指定备份类别的保留批次数
    pub fn keep_for_class(&self, class: &str) -> u32 {
        if class == backup::CLASS_STACKS {
            self.backup.keep_stacks
        } else {
            self.backup.keep_volumes
        }
    }

    /// 生成带注释的TOML配置
    fn to_toml_with_comments(&self) -> String {
        const TEMPLATE: &str = include_str!("../templates/config.toml.template");

        let kind = match self.remote.kind {
            RemoteKind::Rclone => "rclone",
            RemoteKind::Local => "local",
        };

        TEMPLATE
            .replace("{graceful_enabled}", &self.graceful.enabled.to_string())
            .replace("{marker_label}", &self.graceful.marker_label)
            .replace(
                "{default_timeout}",
                &self.graceful.default_timeout.to_string(),
            )
            .replace(
                "{state_file}",
                &self.graceful.state_file.to_string_lossy(),
            )
            .replace(
                "{settle_delay_secs}",
                &self.graceful.settle_delay_secs.to_string(),
            )
            .replace("{volumes_dir}", &self.backup.volumes_dir.to_string_lossy())
            .replace("{stacks_dir}", &self.backup.stacks_dir.to_string_lossy())
            .replace("{staging_dir}", &self.backup.staging_dir.to_string_lossy())
            .replace(
                "{compression_level}",
                &self.backup.compression_level.to_string(),
            )
            .replace("{keep_volumes}", &self.backup.keep_volumes.to_string())
            .replace("{keep_stacks}", &self.backup.keep_stacks.to_string())
            .replace("{remote_kind}", kind)
            .replace("{remote_target}", &self.remote.target)
            .replace("{base_path}", &self.remote.base_path)
            .replace("{log_dir}", &self.log.dir.to_string_lossy())
    }

    /// 确保本地暂存目录和状态文件目录存在
    pub fn ensure_local_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.backup.staging_dir)?;
        if let Some(parent) = self.graceful.state_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[remote]
target = "b2:"
"#,
        )
        .unwrap();

        assert!(config.graceful.enabled);
        assert_eq!(config.graceful.default_timeout, 30);
        assert_eq!(config.backup.keep_volumes, 7);
        assert_eq!(config.remote.kind, RemoteKind::Rclone);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_keep() {
        let mut config = AppConfig::default();
        config.remote.target = "b2:".to_string();
        config.backup.keep_stacks = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, DockbackError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_empty_target() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_template_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dockback.toml");

        let mut config = AppConfig::default();
        config.remote.target = "s3remote:".to_string();
        config.backup.keep_stacks = 3;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.remote.target, "s3remote:");
        assert_eq!(loaded.backup.keep_stacks, 3);
        assert_eq!(loaded.keep_for_class("stacks"), 3);
        assert_eq!(loaded.keep_for_class("volumes"), 7);
        assert!(loaded.remote.server_id.is_none());
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let err = AppConfig::load_from_file("/nonexistent/dockback.toml").unwrap_err();
        assert!(matches!(err, DockbackError::ConfigNotFound));
    }
}
