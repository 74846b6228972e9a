use crate::project_info::{metadata, version_info};
use clap::{Parser, Subcommand, ValueEnum};
use dockback_core::constants::backup::{CLASS_STACKS, CLASS_VOLUMES};
use std::path::PathBuf;

/// 优雅停机相关命令
#[derive(Subcommand, Debug, PartialEq)]
pub enum GracefulCommand {
    /// 停止或暂停所有带标记的容器，并记录状态
    Stop,
    /// 按记录恢复之前停机的容器
    Start,
    /// 列出带标记的容器及其停机策略（只读）
    List,
}

/// 备份相关命令
#[derive(Subcommand, Debug, PartialEq)]
pub enum BackupCommand {
    /// 备份所有 Docker 卷（期间优雅停机）
    Volumes,
    /// 备份 compose 项目目录
    Stacks,
    /// 依次备份卷与 compose 项目目录
    All,
}

/// 恢复相关命令
#[derive(Subcommand, Debug, PartialEq)]
pub enum RestoreCommand {
    /// 恢复一个卷
    Volume {
        /// 卷的有意义名称，例如 app_pgdata
        name: String,
        /// 备份批次时间戳（YYYY-MM-DD_HH-MM-SS），默认最新
        #[arg(long)]
        timestamp: Option<String>,
        /// 解压目标目录，默认为同名卷的挂载点
        #[arg(long)]
        target: Option<PathBuf>,
        /// 目标目录非空时强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 恢复一个 compose 项目目录
    Stack {
        /// 项目目录名
        name: String,
        /// 备份批次时间戳（YYYY-MM-DD_HH-MM-SS），默认最新
        #[arg(long)]
        timestamp: Option<String>,
        /// 目标目录非空时强制覆盖
        #[arg(long)]
        force: bool,
    },
}

/// 备份类别
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackupClass {
    Volumes,
    Stacks,
}

impl BackupClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupClass::Volumes => CLASS_VOLUMES,
            BackupClass::Stacks => CLASS_STACKS,
        }
    }
}

/// Dockback CLI - Docker 卷与 compose 目录的远程备份工具
#[derive(Parser, Debug)]
#[command(name = "dockback")]
#[command(about = metadata::PROJECT_DESCRIPTION)]
#[command(version = version_info::CLI_VERSION)]
#[command(long_about = metadata::display::DESCRIPTION_LONG)]
#[command(author = metadata::PROJECT_AUTHORS)]
pub struct Cli {
    /// 配置文件路径，未指定时依次查找 dockback.toml、.dockback.toml、/etc/dockback/dockback.toml
    #[arg(short, long, env = "DOCKBACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// 生成默认配置文件
    Init {
        /// 如果配置文件已存在，强制覆盖
        #[arg(long)]
        force: bool,
    },
    /// 容器优雅停机与恢复
    #[command(subcommand)]
    Graceful(GracefulCommand),
    /// 执行备份
    #[command(subcommand)]
    Backup(BackupCommand),
    /// 列出远程备份批次
    ListBackups {
        #[arg(value_enum)]
        class: BackupClass,
    },
    /// 按保留数量清理过期备份，未指定类别时清理全部
    Prune {
        #[arg(value_enum)]
        class: Option<BackupClass>,
    },
    /// 从远程备份恢复
    #[command(subcommand)]
    Restore(RestoreCommand),
    /// 列出本机卷及其备份名称
    Volumes,
}

impl Commands {
    /// 日志文件按运行类型区分
    pub fn run_type(&self) -> &'static str {
        match self {
            Commands::Graceful(_) => "graceful",
            Commands::Backup(_) => "backup",
            Commands::Restore(_) => "restore",
            Commands::Init { .. }
            | Commands::ListBackups { .. }
            | Commands::Prune { .. }
            | Commands::Volumes => "maintenance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graceful_stop() {
        let cli = Cli::try_parse_from(["dockback", "graceful", "stop"]).unwrap();
        assert_eq!(cli.command, Commands::Graceful(GracefulCommand::Stop));
        assert_eq!(cli.command.run_type(), "graceful");
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_restore_volume() {
        let cli = Cli::try_parse_from([
            "dockback",
            "-v",
            "-c",
            "/etc/dockback/dockback.toml",
            "restore",
            "volume",
            "app_pgdata",
            "--timestamp",
            "2024-01-01_02-00-00",
            "--force",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/dockback/dockback.toml")));
        assert_eq!(
            cli.command,
            Commands::Restore(RestoreCommand::Volume {
                name: "app_pgdata".to_string(),
                timestamp: Some("2024-01-01_02-00-00".to_string()),
                target: None,
                force: true,
            })
        );
        assert_eq!(cli.command.run_type(), "restore");
    }

    #[test]
    fn test_parse_prune_class() {
        let cli = Cli::try_parse_from(["dockback", "prune", "stacks"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Prune {
                class: Some(BackupClass::Stacks)
            }
        );

        let cli = Cli::try_parse_from(["dockback", "prune"]).unwrap();
        assert_eq!(cli.command, Commands::Prune { class: None });
        assert_eq!(cli.command.run_type(), "maintenance");
    }

    #[test]
    fn test_reject_unknown_class() {
        assert!(Cli::try_parse_from(["dockback", "list-backups", "images"]).is_err());
    }
}
