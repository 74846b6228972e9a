use super::types::QuiesceRecord;
use crate::constants::graceful::STATE_FORMAT_VERSION;
use crate::{DockbackError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

/// 停机状态存储，连接 prepare 与 resume 两个独立进程
pub trait StateStore {
    /// 原子地覆盖已有内容
    fn record(&self, entries: &[QuiesceRecord]) -> Result<()>;

    /// 读取全部记录，存储不存在或无法解析时返回空列表
    fn load(&self) -> Result<Vec<QuiesceRecord>>;

    /// 删除存储，重复调用不报错
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StateDocument {
    version: u32,
    written_at: DateTime<Utc>,
    records: Vec<QuiesceRecord>,
}

/// 基于 JSON 文件的状态存储
///
/// 先写入同目录下的临时文件并 fsync，再 rename 覆盖目标文件，
/// 读取方只会看到完整的旧文件或完整的新文件。
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 将无法读取的状态文件移到 `<文件名>.corrupt-<时间戳>`，供人工检查
    fn quarantine(&self) -> Option<PathBuf> {
        let mut name = self.path.file_name()?.to_os_string();
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%d%H%M%S")));
        let target = self.path.with_file_name(name);

        match std::fs::rename(&self.path, &target) {
            Ok(()) => {
                warn!("损坏的状态文件已移至 {}", target.display());
                Some(target)
            }
            Err(e) => {
                warn!("移走损坏的状态文件失败，下次写入时将被覆盖: {}", e);
                None
            }
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl StateStore for FileStateStore {
    fn record(&self, entries: &[QuiesceRecord]) -> Result<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let document = StateDocument {
            version: STATE_FORMAT_VERSION,
            written_at: Utc::now(),
            records: entries.to_vec(),
        };
        let content = serde_json::to_vec_pretty(&document)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| {
            DockbackError::state(format!(
                "写入状态文件 {} 失败: {}",
                self.path.display(),
                e.error
            ))
        })?;

        debug!(
            "已写入 {} 条停机记录到 {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Vec<QuiesceRecord>> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let problem = match serde_json::from_slice::<StateDocument>(&content) {
            Ok(document) if document.version == STATE_FORMAT_VERSION => {
                return Ok(document.records);
            }
            Ok(document) => format!("版本 {} 不受支持", document.version),
            Err(e) => format!("内容损坏: {e}"),
        };

        // 无法解析的状态文件不能阻塞后续的备份周期
        error!("状态文件 {} {}，已忽略其中的记录", self.path.display(), problem);
        self.quarantine();
        Ok(Vec::new())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ComposeAssociation;
    use crate::graceful::types::{QuiesceMethod, QuiescePolicy};
    use tempfile::tempdir;

    fn sample_records() -> Vec<QuiesceRecord> {
        vec![
            QuiesceRecord {
                container_name: "db".to_string(),
                policy: QuiescePolicy {
                    method: QuiesceMethod::Stop,
                    pre_command: None,
                    post_command: None,
                    timeout_secs: 45,
                },
                was_running: true,
                compose: None,
            },
            QuiesceRecord {
                container_name: "cache".to_string(),
                policy: QuiescePolicy {
                    method: QuiesceMethod::Pause,
                    pre_command: Some("redis-cli save".to_string()),
                    post_command: Some("redis-cli ping".to_string()),
                    timeout_secs: 30,
                },
                was_running: true,
                compose: Some(ComposeAssociation {
                    project: "app".to_string(),
                    service: "cache".to_string(),
                    working_dir: None,
                }),
            },
        ]
    }

    #[test]
    fn test_record_then_load_preserves_order() {
        let dir = tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        let records = sample_records();
        store.record(&records).unwrap();

        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn test_record_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        store.record(&sample_records()).unwrap();
        let single = vec![sample_records().remove(1)];
        store.record(&single).unwrap();

        assert_eq!(store.load().unwrap(), single);
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.json"));

        store.record(&sample_records()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_record_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested/run/state.json"));

        store.record(&sample_records()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_store_is_moved_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{truncated").unwrap();

        let store = FileStateStore::new(&path);
        assert!(store.load().unwrap().is_empty());
        assert!(!path.exists());

        let kept: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].starts_with("state.json.corrupt-"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(&kept[0])).unwrap(),
            "{truncated"
        );

        // 之后的写入与读取恢复正常
        store.record(&sample_records()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_unsupported_version_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"version":99,"written_at":"2024-01-01T02:00:00Z","records":[]}"#,
        )
        .unwrap();

        assert!(FileStateStore::new(&path).load().unwrap().is_empty());
        assert!(!path.exists());
    }
}
