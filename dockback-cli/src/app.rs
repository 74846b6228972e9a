use anyhow::{Context, Result};
use dockback_core::{
    backup::BackupManager, config::AppConfig, container::DockerCli, storage::Storage,
};
use std::path::Path;
use tracing::info;

use crate::cli::{BackupCommand, Commands, GracefulCommand, RestoreCommand};
use crate::commands;

pub struct CliApp {
    pub config: AppConfig,
    pub docker: DockerCli,
    pub storage: Storage,
    pub backup_manager: BackupManager<Storage>,
}

/// 按 `-c` 指定的路径或默认查找顺序加载配置
pub fn load_config(path: Option<&Path>) -> dockback_core::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::find_and_load_config(),
    }
}

impl CliApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        config
            .ensure_local_dirs()
            .context("创建暂存目录或状态文件目录失败")?;

        let docker = DockerCli::new();
        let storage = Storage::from_config(&config.remote);
        let backup_manager = BackupManager::new(config.clone(), docker.clone(), storage.clone());

        Ok(Self {
            config,
            docker,
            storage,
            backup_manager,
        })
    }

    /// 运行应用命令，返回 Ok 表示没有致命错误
    pub async fn run_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Init { .. } => unreachable!(), // 已经在 main.rs 中处理
            Commands::Graceful(cmd) => self.run_graceful_command(cmd).await,
            Commands::Backup(cmd) => self.run_backup_command(cmd).await,
            Commands::ListBackups { class } => commands::run_list_backups(self, class).await,
            Commands::Prune { class } => commands::run_prune(self, class).await,
            Commands::Restore(cmd) => self.run_restore_command(cmd).await,
            Commands::Volumes => commands::run_list_volumes(self).await,
        }
    }

    async fn run_graceful_command(&self, cmd: GracefulCommand) -> Result<()> {
        match cmd {
            GracefulCommand::Stop => {
                info!("⏸️  优雅停机带标记的容器...");
                commands::run_graceful_stop(self).await
            }
            GracefulCommand::Start => {
                info!("▶️  恢复之前停机的容器...");
                commands::run_graceful_start(self).await
            }
            GracefulCommand::List => commands::run_graceful_list(self).await,
        }
    }

    async fn run_backup_command(&self, cmd: BackupCommand) -> Result<()> {
        match cmd {
            BackupCommand::Volumes => commands::run_backup_volumes(self).await,
            BackupCommand::Stacks => commands::run_backup_stacks(self).await,
            BackupCommand::All => {
                let volumes = commands::run_backup_volumes(self).await;
                let stacks = commands::run_backup_stacks(self).await;
                volumes.and(stacks)
            }
        }
    }

    async fn run_restore_command(&self, cmd: RestoreCommand) -> Result<()> {
        match cmd {
            RestoreCommand::Volume {
                name,
                timestamp,
                target,
                force,
            } => {
                info!("♻️  恢复卷: {}", name);
                commands::run_restore_volume(self, &name, timestamp.as_deref(), target.as_deref(), force)
                    .await
            }
            RestoreCommand::Stack {
                name,
                timestamp,
                force,
            } => {
                info!("♻️  恢复 compose 项目: {}", name);
                commands::run_restore_stack(self, &name, timestamp.as_deref(), force).await
            }
        }
    }
}
