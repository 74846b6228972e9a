use crate::config::{RemoteConfig, RemoteKind};
use crate::constants::command;
use crate::{DockbackError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// 远程存储中的一个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

/// 远程存储的最小操作集合，路径为以 `/` 分隔的相对路径
#[allow(async_fn_in_trait)]
pub trait RemoteStorage {
    /// 列出目录下的直接子项，目录不存在时返回空列表
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>>;

    async fn upload(&self, local: &Path, remote: &str) -> Result<()>;

    async fn download(&self, remote: &str, local: &Path) -> Result<()>;

    /// 递归删除文件或目录
    async fn delete(&self, path: &str) -> Result<()>;
}

/// 拼接远程路径，忽略空段
pub fn join_remote(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// 根据配置构造存储后端
#[derive(Debug, Clone)]
pub enum Storage {
    Rclone(RcloneStorage),
    Local(LocalStorage),
}

impl Storage {
    pub fn from_config(config: &RemoteConfig) -> Self {
        match config.kind {
            RemoteKind::Rclone => Storage::Rclone(RcloneStorage::new(&config.target)),
            RemoteKind::Local => Storage::Local(LocalStorage::new(&config.target)),
        }
    }

    /// 检查后端依赖是否可用
    pub async fn check_available(&self) -> Result<()> {
        match self {
            Storage::Rclone(_) => {
                if which::which(command::RCLONE).is_err() {
                    return Err(DockbackError::storage("rclone 未安装或不在 PATH 中"));
                }
                Ok(())
            }
            Storage::Local(local) => {
                tokio::fs::create_dir_all(&local.root).await?;
                Ok(())
            }
        }
    }
}

impl RemoteStorage for Storage {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        match self {
            Storage::Rclone(s) => s.list(path).await,
            Storage::Local(s) => s.list(path).await,
        }
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        match self {
            Storage::Rclone(s) => s.upload(local, remote).await,
            Storage::Local(s) => s.upload(local, remote).await,
        }
    }

    async fn download(&self, remote: &str, local: &Path) -> Result<()> {
        match self {
            Storage::Rclone(s) => s.download(remote, local).await,
            Storage::Local(s) => s.download(remote, local).await,
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        match self {
            Storage::Rclone(s) => s.delete(path).await,
            Storage::Local(s) => s.delete(path).await,
        }
    }
}

/// 基于 rclone CLI 的远程存储
#[derive(Debug, Clone)]
pub struct RcloneStorage {
    target: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsJsonEntry {
    name: String,
    #[serde(default)]
    size: i64,
    is_dir: bool,
}

/// 解析 `rclone lsjson` 输出
pub(crate) fn parse_lsjson(json_output: &str) -> Result<Vec<RemoteEntry>> {
    if json_output.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<LsJsonEntry> = serde_json::from_str(json_output)?;
    Ok(entries
        .into_iter()
        .map(|e| RemoteEntry {
            name: e.name,
            is_dir: e.is_dir,
            size: e.size.max(0) as u64,
        })
        .collect())
}

impl RcloneStorage {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }

    /// `remote:` 或 `remote:bucket` 与相对路径拼接
    fn remote_path(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.target.clone()
        } else if self.target.ends_with(':') || self.target.ends_with('/') {
            format!("{}{}", self.target, path)
        } else {
            format!("{}/{}", self.target, path)
        }
    }

    async fn run_rclone(&self, args: &[&str]) -> Result<std::process::Output> {
        debug!("执行: rclone {}", args.join(" "));
        let output = Command::new(command::RCLONE)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;
        Ok(output)
    }

    async fn rclone_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run_rclone(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DockbackError::storage(format!(
                "rclone {} 失败: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl RemoteStorage for RcloneStorage {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let remote = self.remote_path(path);
        let output = self.run_rclone(&["lsjson", &remote]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("directory not found") {
                return Ok(Vec::new());
            }
            return Err(DockbackError::storage(format!(
                "列出 {remote} 失败: {}",
                stderr.trim()
            )));
        }

        parse_lsjson(&String::from_utf8_lossy(&output.stdout))
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        let local = local.to_string_lossy();
        let remote = self.remote_path(remote);
        self.rclone_checked(&["copyto", &local, &remote]).await?;
        Ok(())
    }

    async fn download(&self, remote: &str, local: &Path) -> Result<()> {
        let remote = self.remote_path(remote);
        let local = local.to_string_lossy();
        self.rclone_checked(&["copyto", &remote, &local]).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let remote = self.remote_path(path);
        self.rclone_checked(&["purge", &remote]).await?;
        Ok(())
    }
}

/// 基于本地目录（如 NAS 挂载点）的存储
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }
}

impl RemoteStorage for LocalStorage {
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let dir = self.resolve(path);
        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let metadata = entry.metadata().await?;
            entries.push(RemoteEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        let target = self.resolve(remote);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local, &target).await?;
        Ok(())
    }

    async fn download(&self, remote: &str, local: &Path) -> Result<()> {
        let source = self.resolve(remote);
        if !source.is_file() {
            return Err(DockbackError::storage(format!(
                "远程文件不存在: {remote}"
            )));
        }
        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&source, local).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path);
        if target == self.root {
            return Err(DockbackError::storage("拒绝删除存储根目录"));
        }
        match tokio::fs::symlink_metadata(&target).await {
            Ok(metadata) if metadata.is_dir() => tokio::fs::remove_dir_all(&target).await?,
            Ok(_) => tokio::fs::remove_file(&target).await?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}
