use crate::archive::{
    archive_file_name, create_archive, empty_directory, extract_archive, name_from_archive,
};
use crate::config::AppConfig;
use crate::constants::backup::{CLASS_STACKS, CLASS_VOLUMES, COMPOSE_FILE_NAMES, MANIFEST_EXTENSION};
use crate::container::DockerCli;
use crate::graceful::{
    self, FileStateStore, Orchestrator, PrepareResult, ResumeResult,
};
use crate::retention::{self, RetentionCandidate};
use crate::storage::{RemoteStorage, join_remote};
use crate::volume::{self, VolumeDescriptor};
use crate::{DockbackError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// 备份管理器：串联优雅停机、打包、上传、保留策略与恢复
#[derive(Debug, Clone)]
pub struct BackupManager<S> {
    config: AppConfig,
    docker: DockerCli,
    storage: S,
}

/// 一次备份的结果汇总
#[derive(Debug, Clone, Default)]
pub struct BackupSummary {
    pub class: String,
    pub timestamp: String,
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
    pub pruned: Vec<String>,
    pub prepare: Option<PrepareResult>,
    pub resume: Option<ResumeResult>,
}

impl BackupSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
            && self.prepare.as_ref().is_none_or(PrepareResult::is_clean)
            && self.resume.as_ref().is_none_or(ResumeResult::is_clean)
    }
}

/// 远程存储中的一个备份批次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRun {
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub archives: Vec<String>,
}

/// 已打包、待上传的文件
struct StagedArchive {
    name: String,
    archive: PathBuf,
    manifest: Option<PathBuf>,
}

impl<S: RemoteStorage> BackupManager<S> {
    pub fn new(config: AppConfig, docker: DockerCli, storage: S) -> Self {
        Self {
            config,
            docker,
            storage,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn docker(&self) -> &DockerCli {
        &self.docker
    }

    /// 基于配置构造优雅停机编排器
    pub fn orchestrator(&self) -> Orchestrator<DockerCli, DockerCli, FileStateStore> {
        let settings = &self.config.graceful;
        Orchestrator::new(
            self.docker.clone(),
            self.docker.clone(),
            FileStateStore::new(&settings.state_file),
        )
        .with_settle_delay(Duration::from_secs(settings.settle_delay_secs))
    }

    /// 远程命名空间：`<base_path>/<server_id>/<class>`
    pub fn class_root(&self, class: &str) -> String {
        let remote = &self.config.remote;
        join_remote(&[
            &remote.base_path,
            remote.server_id.as_deref().unwrap_or_default(),
            class,
        ])
    }

    /// 发现并停机带标记的容器；未启用优雅停机时返回 None
    pub async fn graceful_prepare(&self) -> Result<Option<PrepareResult>> {
        let settings = &self.config.graceful;
        if !settings.enabled {
            debug!("优雅停机未启用");
            return Ok(None);
        }

        let containers = graceful::discover(&self.docker, &settings.marker_label).await?;
        let result = self
            .orchestrator()
            .prepare(containers, settings.default_timeout)
            .await?;
        Ok(Some(result))
    }

    /// 恢复之前停机的容器；状态存储为空时为空操作
    ///
    /// 不受 `enabled` 限制：关闭优雅停机之前遗留的记录也必须被恢复。
    pub async fn graceful_resume(&self) -> Result<ResumeResult> {
        self.orchestrator().resume().await
    }

    /// 备份所有 Docker 卷
    ///
    /// 打包期间容器处于停机状态，打包完成后立即恢复，再上传。
    /// 停机阶段失败不会阻止备份：部分停机的备份好过没有备份。
    #[instrument(skip(self))]
    pub async fn backup_volumes(&self) -> Result<BackupSummary> {
        let now = Utc::now();
        let timestamp = retention::format_timestamp(&now);
        let mut summary = BackupSummary {
            class: CLASS_VOLUMES.to_string(),
            timestamp: timestamp.clone(),
            ..Default::default()
        };

        info!("开始卷备份批次 {}", timestamp);

        match self.graceful_prepare().await {
            Ok(prepare) => summary.prepare = prepare,
            Err(e) => error!("优雅停机失败，容器未被改动，继续备份: {}", e),
        }

        let run_dir = self.staging_run_dir(CLASS_VOLUMES, &timestamp);
        let staged = self.stage_volumes(&run_dir, &mut summary).await;

        match self.graceful_resume().await {
            Ok(resume) => summary.resume = Some(resume),
            Err(e) => error!("恢复容器失败，请手动检查: {}", e),
        }

        let staged = match staged {
            Ok(staged) => staged,
            Err(e) => {
                self.cleanup_staging(&run_dir).await;
                return Err(e);
            }
        };

        self.upload_staged(CLASS_VOLUMES, &timestamp, staged, &mut summary)
            .await;
        self.cleanup_staging(&run_dir).await;
        self.prune_after_upload(CLASS_VOLUMES, &mut summary).await;

        Ok(summary)
    }

    /// 备份 stacks_dir 下所有包含 compose 文件的项目目录
    #[instrument(skip(self))]
    pub async fn backup_stacks(&self) -> Result<BackupSummary> {
        let now = Utc::now();
        let timestamp = retention::format_timestamp(&now);
        let mut summary = BackupSummary {
            class: CLASS_STACKS.to_string(),
            timestamp: timestamp.clone(),
            ..Default::default()
        };

        info!("开始 compose 目录备份批次 {}", timestamp);

        let run_dir = self.staging_run_dir(CLASS_STACKS, &timestamp);
        let staged = match self.stage_stacks(&run_dir, &mut summary).await {
            Ok(staged) => staged,
            Err(e) => {
                self.cleanup_staging(&run_dir).await;
                return Err(e);
            }
        };

        self.upload_staged(CLASS_STACKS, &timestamp, staged, &mut summary)
            .await;
        self.cleanup_staging(&run_dir).await;
        self.prune_after_upload(CLASS_STACKS, &mut summary).await;

        Ok(summary)
    }

    /// 列出某个类别的所有备份批次，按时间从新到旧
    pub async fn list_backups(&self, class: &str) -> Result<Vec<BackupRun>> {
        let root = self.class_root(class);
        let mut runs = Vec::new();

        for entry in self.storage.list(&root).await? {
            if !entry.is_dir {
                continue;
            }
            let Some(timestamp) = retention::parse_timestamp(&entry.name) else {
                warn!("忽略无法识别的远程目录: {}/{}", root, entry.name);
                continue;
            };

            let path = join_remote(&[&root, &entry.name]);
            let archives = self
                .storage
                .list(&path)
                .await?
                .into_iter()
                .filter(|e| !e.is_dir)
                .filter_map(|e| name_from_archive(&e.name).map(str::to_string))
                .collect();

            runs.push(BackupRun {
                timestamp,
                path,
                archives,
            });
        }

        runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(runs)
    }

    /// 按保留数量删除过期的备份批次，返回已删除的路径
    #[instrument(skip(self))]
    pub async fn prune(&self, class: &str) -> Result<Vec<String>> {
        let keep = self.config.keep_for_class(class) as usize;
        let root = self.class_root(class);

        let mut candidates = Vec::new();
        for entry in self.storage.list(&root).await? {
            if !entry.is_dir {
                continue;
            }
            match retention::parse_timestamp(&entry.name) {
                Some(timestamp) => candidates.push(RetentionCandidate {
                    path: join_remote(&[&root, &entry.name]),
                    timestamp,
                }),
                None => warn!("忽略无法识别的远程目录: {}/{}", root, entry.name),
            }
        }

        let total = candidates.len();
        let expired = retention::select_for_deletion(candidates, keep);
        if expired.is_empty() {
            info!("{} 共 {} 个批次，未超过保留数 {}", class, total, keep);
            return Ok(Vec::new());
        }

        let mut deleted = Vec::with_capacity(expired.len());
        for path in expired {
            match self.storage.delete(&path).await {
                Ok(()) => {
                    info!("🗑️  删除过期备份: {}", path);
                    deleted.push(path);
                }
                Err(e) => warn!("删除过期备份 {} 失败: {}", path, e),
            }
        }
        Ok(deleted)
    }

    /// 从远程恢复一个卷
    ///
    /// 未指定目标目录时，按有意义名称（其次按原卷 ID）匹配本机现有的卷。
    /// 目标目录非空时需要 `force`，恢复前清空目录内容。
    #[instrument(skip(self))]
    pub async fn restore_volume(
        &self,
        name: &str,
        timestamp: Option<&str>,
        target: Option<&Path>,
        force: bool,
    ) -> Result<PathBuf> {
        let run = self.resolve_run(CLASS_VOLUMES, timestamp).await?;
        let restore_dir = self.config.backup.staging_dir.join("restore");
        let local_archive = restore_dir.join(archive_file_name(name));

        self.storage
            .download(&join_remote(&[&run.path, &archive_file_name(name)]), &local_archive)
            .await?;

        let target_dir = match target {
            Some(dir) => dir.to_path_buf(),
            None => {
                let manifest = self.fetch_manifest(&run.path, name, &restore_dir).await;
                self.locate_volume_dir(name, manifest.as_ref()).await?
            }
        };

        let outcome = self.extract_into(&local_archive, &target_dir, force).await;
        if let Err(e) = tokio::fs::remove_file(&local_archive).await {
            debug!("删除临时归档失败: {}", e);
        }
        outcome?;

        info!("✅ 卷 {} 已从批次 {} 恢复到 {}", name, retention::format_timestamp(&run.timestamp), target_dir.display());
        Ok(target_dir)
    }

    /// 从远程恢复一个 compose 项目目录到 stacks_dir
    #[instrument(skip(self))]
    pub async fn restore_stack(&self, name: &str, timestamp: Option<&str>, force: bool) -> Result<PathBuf> {
        let run = self.resolve_run(CLASS_STACKS, timestamp).await?;
        let local_archive = self
            .config
            .backup
            .staging_dir
            .join("restore")
            .join(archive_file_name(name));

        self.storage
            .download(&join_remote(&[&run.path, &archive_file_name(name)]), &local_archive)
            .await?;

        let target_dir = self.config.backup.stacks_dir.join(name);
        let outcome = self.extract_into(&local_archive, &target_dir, force).await;
        if let Err(e) = tokio::fs::remove_file(&local_archive).await {
            debug!("删除临时归档失败: {}", e);
        }
        outcome?;

        info!("✅ compose 项目 {} 已恢复到 {}", name, target_dir.display());
        Ok(target_dir)
    }

    /// 选择备份批次：指定时间戳时精确匹配，否则取最新
    async fn resolve_run(&self, class: &str, timestamp: Option<&str>) -> Result<BackupRun> {
        let runs = self.list_backups(class).await?;
        let run = match timestamp {
            Some(ts) => {
                let wanted = retention::parse_timestamp(ts).ok_or_else(|| {
                    DockbackError::backup(format!("时间戳格式无效: {ts}，应为 YYYY-MM-DD_HH-MM-SS"))
                })?;
                runs.into_iter().find(|r| r.timestamp == wanted)
            }
            None => runs.into_iter().next(),
        };

        run.ok_or_else(|| DockbackError::backup(format!("未找到 {class} 的备份批次")))
    }

    async fn stage_volumes(
        &self,
        run_dir: &Path,
        summary: &mut BackupSummary,
    ) -> Result<Vec<StagedArchive>> {
        let volumes = volume::discover_volumes(&self.docker).await?;
        info!("发现 {} 个卷", volumes.len());

        let mut staged = Vec::with_capacity(volumes.len());
        for volume in volumes {
            if volume.is_excluded(&self.config.backup.exclude_volumes) {
                info!("跳过排除的卷: {}", volume.meaningful_name);
                continue;
            }

            let name = volume.meaningful_name.clone();
            match self.stage_volume(&volume, run_dir).await {
                Ok(item) => staged.push(item),
                Err(e) => {
                    error!("打包卷 {} 失败: {}", name, e);
                    summary.failed.push(name);
                }
            }
        }
        Ok(staged)
    }

    async fn stage_volume(&self, volume: &VolumeDescriptor, run_dir: &Path) -> Result<StagedArchive> {
        let source = volume.mountpoint.clone().unwrap_or_else(|| {
            self.config
                .backup
                .volumes_dir
                .join(&volume.volume_id)
                .join("_data")
        });

        let archive = run_dir.join(archive_file_name(&volume.meaningful_name));
        let entries = create_archive(&source, &archive, self.config.backup.compression_level).await?;
        info!("📦 卷 {} 已打包 ({} 个条目)", volume.meaningful_name, entries);

        let manifest = run_dir.join(format!("{}.{MANIFEST_EXTENSION}", volume.meaningful_name));
        tokio::fs::write(&manifest, serde_json::to_vec_pretty(volume)?).await?;

        Ok(StagedArchive {
            name: volume.meaningful_name.clone(),
            archive,
            manifest: Some(manifest),
        })
    }

    async fn stage_stacks(
        &self,
        run_dir: &Path,
        summary: &mut BackupSummary,
    ) -> Result<Vec<StagedArchive>> {
        let stacks_dir = &self.config.backup.stacks_dir;
        if !stacks_dir.is_dir() {
            return Err(DockbackError::backup(format!(
                "compose 项目根目录不存在: {}",
                stacks_dir.display()
            )));
        }

        let mut projects = Vec::new();
        let mut entries = tokio::fs::read_dir(stacks_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() && has_compose_file(&path) {
                projects.push(path);
            }
        }
        projects.sort();
        info!("发现 {} 个 compose 项目", projects.len());

        let mut staged = Vec::with_capacity(projects.len());
        for project in projects {
            let name = project
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let archive = run_dir.join(archive_file_name(&name));

            match create_archive(&project, &archive, self.config.backup.compression_level).await {
                Ok(entries) => {
                    info!("📦 compose 项目 {} 已打包 ({} 个条目)", name, entries);
                    staged.push(StagedArchive {
                        name,
                        archive,
                        manifest: None,
                    });
                }
                Err(e) => {
                    error!("打包 compose 项目 {} 失败: {}", name, e);
                    summary.failed.push(name);
                }
            }
        }
        Ok(staged)
    }

    async fn upload_staged(
        &self,
        class: &str,
        timestamp: &str,
        staged: Vec<StagedArchive>,
        summary: &mut BackupSummary,
    ) {
        let remote_dir = join_remote(&[&self.class_root(class), timestamp]);

        for item in staged {
            let mut files = vec![item.archive];
            files.extend(item.manifest);

            let mut ok = true;
            for file in &files {
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let remote = join_remote(&[&remote_dir, &file_name]);
                if let Err(e) = self.storage.upload(file, &remote).await {
                    error!("上传 {} 失败: {}", remote, e);
                    ok = false;
                    break;
                }
            }

            if ok {
                info!("☁️  已上传 {} -> {}", item.name, remote_dir);
                summary.uploaded.push(item.name);
            } else {
                summary.failed.push(item.name);
            }
        }
    }

    /// 本批次至少上传成功一项时才执行保留策略，避免失败的批次挤掉旧备份
    async fn prune_after_upload(&self, class: &str, summary: &mut BackupSummary) {
        if summary.uploaded.is_empty() {
            warn!("本批次没有成功上传的备份，跳过保留策略");
            return;
        }
        match self.prune(class).await {
            Ok(pruned) => summary.pruned = pruned,
            Err(e) => warn!("执行保留策略失败: {}", e),
        }
    }

    async fn fetch_manifest(&self, run_path: &str, name: &str, local_dir: &Path) -> Option<VolumeDescriptor> {
        let file_name = format!("{name}.{MANIFEST_EXTENSION}");
        let local = local_dir.join(&file_name);

        if let Err(e) = self
            .storage
            .download(&join_remote(&[run_path, &file_name]), &local)
            .await
        {
            debug!("卷 {} 没有描述文件: {}", name, e);
            return None;
        }

        let manifest = tokio::fs::read(&local)
            .await
            .ok()
            .and_then(|content| serde_json::from_slice::<VolumeDescriptor>(&content).ok());
        let _ = tokio::fs::remove_file(&local).await;
        manifest
    }

    async fn locate_volume_dir(
        &self,
        name: &str,
        manifest: Option<&VolumeDescriptor>,
    ) -> Result<PathBuf> {
        let volumes = volume::discover_volumes(&self.docker).await?;
        let found = volumes
            .iter()
            .find(|v| v.meaningful_name == name)
            .or_else(|| {
                manifest.and_then(|m| volumes.iter().find(|v| v.volume_id == m.volume_id))
            })
            .ok_or_else(|| {
                DockbackError::backup(format!(
                    "本机没有与 {name} 匹配的卷，请先创建卷（例如 docker compose up --no-start）或使用 --target 指定目录"
                ))
            })?;

        if !found.attached_containers.is_empty() {
            warn!(
                "卷 {} 被以下容器挂载，恢复前应先停止: {}",
                found.volume_id,
                found.attached_containers.join(", ")
            );
        }

        Ok(found.mountpoint.clone().unwrap_or_else(|| {
            self.config
                .backup
                .volumes_dir
                .join(&found.volume_id)
                .join("_data")
        }))
    }

    async fn extract_into(&self, archive: &Path, target_dir: &Path, force: bool) -> Result<()> {
        if dir_has_entries(target_dir) {
            if !force {
                return Err(DockbackError::backup(format!(
                    "目标目录 {} 非空，请使用 --force 覆盖",
                    target_dir.display()
                )));
            }
            warn!("目标目录 {} 非空，将被清空和覆盖", target_dir.display());
            empty_directory(target_dir).await?;
        }
        extract_archive(archive, target_dir).await
    }

    fn staging_run_dir(&self, class: &str, timestamp: &str) -> PathBuf {
        self.config.backup.staging_dir.join(class).join(timestamp)
    }

    async fn cleanup_staging(&self, run_dir: &Path) {
        if let Err(e) = tokio::fs::remove_dir_all(run_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("清理暂存目录 {} 失败: {}", run_dir.display(), e);
            }
        }
    }
}

fn has_compose_file(dir: &Path) -> bool {
    COMPOSE_FILE_NAMES.iter().any(|name| dir.join(name).is_file())
}

fn dir_has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteKind;
    use crate::graceful::{QuiesceMethod, QuiescePolicy, QuiesceRecord, StateStore};
    use crate::storage::LocalStorage;
    use tempfile::{TempDir, tempdir};

    fn setup(keep_stacks: u32) -> (TempDir, BackupManager<LocalStorage>) {
        let dir = tempdir().unwrap();

        let mut config = AppConfig::default();
        config.graceful.enabled = false;
        config.graceful.state_file = dir.path().join("state/graceful-state.json");
        config.backup.stacks_dir = dir.path().join("stacks");
        config.backup.staging_dir = dir.path().join("staging");
        config.backup.keep_stacks = keep_stacks;
        config.remote.kind = RemoteKind::Local;
        config.remote.target = dir.path().join("remote").to_string_lossy().to_string();
        config.remote.server_id = Some("host-a".to_string());

        let stack = config.backup.stacks_dir.join("wiki");
        std::fs::create_dir_all(&stack).unwrap();
        std::fs::write(stack.join("compose.yaml"), "services:\n  app:\n    image: wiki\n").unwrap();
        std::fs::write(stack.join(".env"), "PORT=8080\n").unwrap();
        // 没有 compose 文件的目录不会被备份
        std::fs::create_dir_all(config.backup.stacks_dir.join("scratch")).unwrap();

        let storage = LocalStorage::new(&config.remote.target);
        let manager = BackupManager::new(config, DockerCli::new(), storage);
        (dir, manager)
    }

    fn seed_run(dir: &TempDir, class: &str, name: &str) {
        let run = dir
            .path()
            .join("remote/dockback/host-a")
            .join(class)
            .join(name);
        std::fs::create_dir_all(&run).unwrap();
    }

    #[test]
    fn test_class_root_includes_server_id() {
        let (_dir, manager) = setup(7);
        assert_eq!(manager.class_root("volumes"), "dockback/host-a/volumes");
    }

    #[tokio::test]
    async fn test_backup_stacks_uploads_compose_projects() {
        let (dir, manager) = setup(7);

        let summary = manager.backup_stacks().await.unwrap();

        assert_eq!(summary.uploaded, vec!["wiki"]);
        assert!(summary.failed.is_empty());
        assert!(summary.is_clean());

        let runs = manager.list_backups("stacks").await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].archives, vec!["wiki"]);
        assert_eq!(retention::format_timestamp(&runs[0].timestamp), summary.timestamp);

        // 暂存目录已清理
        assert!(!dir.path().join("staging/stacks").join(&summary.timestamp).exists());
    }

    #[tokio::test]
    async fn test_prune_keeps_newest_runs() {
        let (dir, manager) = setup(2);
        seed_run(&dir, "stacks", "2024-01-01_02-00-00");
        seed_run(&dir, "stacks", "2024-01-02_02-00-00");
        seed_run(&dir, "stacks", "2024-01-03_02-00-00");
        seed_run(&dir, "stacks", "not-a-backup");

        let mut deleted = manager.prune("stacks").await.unwrap();
        deleted.sort();

        assert_eq!(deleted, vec!["dockback/host-a/stacks/2024-01-01_02-00-00"]);
        let remaining: Vec<String> = manager
            .list_backups("stacks")
            .await
            .unwrap()
            .into_iter()
            .map(|r| retention::format_timestamp(&r.timestamp))
            .collect();
        assert_eq!(remaining, vec!["2024-01-03_02-00-00", "2024-01-02_02-00-00"]);
    }

    #[tokio::test]
    async fn test_restore_stack_round_trip() {
        let (_dir, manager) = setup(7);
        manager.backup_stacks().await.unwrap();

        let stack = manager.config().backup.stacks_dir.join("wiki");
        std::fs::write(stack.join(".env"), "PORT=9999\n").unwrap();

        // 目录非空且未 force 时拒绝覆盖
        assert!(manager.restore_stack("wiki", None, false).await.is_err());

        let restored = manager.restore_stack("wiki", None, true).await.unwrap();
        assert_eq!(restored, stack);
        assert_eq!(std::fs::read_to_string(stack.join(".env")).unwrap(), "PORT=8080\n");
    }

    #[tokio::test]
    async fn test_restore_unknown_timestamp_fails() {
        let (_dir, manager) = setup(7);
        manager.backup_stacks().await.unwrap();

        let err = manager
            .restore_stack("wiki", Some("2000-01-01_00-00-00"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DockbackError::Backup(_)));

        let err = manager
            .restore_stack("wiki", Some("yesterday"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DockbackError::Backup(_)));
    }

    #[tokio::test]
    async fn test_graceful_disabled_skips_prepare() {
        let (_dir, manager) = setup(7);
        assert!(manager.graceful_prepare().await.unwrap().is_none());

        let resumed = manager.graceful_resume().await.unwrap();
        assert_eq!(resumed.restored_count, 0);
        assert!(resumed.is_clean());
    }

    #[tokio::test]
    async fn test_resume_consumes_leftover_records_when_disabled() {
        let (_dir, manager) = setup(7);
        let store = FileStateStore::new(&manager.config().graceful.state_file);
        // 停机前未运行的容器恢复时不调用 docker
        store
            .record(&[QuiesceRecord {
                container_name: "db".to_string(),
                policy: QuiescePolicy {
                    method: QuiesceMethod::Stop,
                    pre_command: None,
                    post_command: None,
                    timeout_secs: 30,
                },
                was_running: false,
                compose: None,
            }])
            .unwrap();

        let resumed = manager.graceful_resume().await.unwrap();

        assert_eq!(resumed.restored_count, 1);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }
}
