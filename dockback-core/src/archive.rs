use crate::{DockbackError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 将目录打包为 tar.gz 归档
///
/// 归档内路径相对于 `source_dir`，保留空目录与符号链接。
/// 压缩在阻塞线程中执行，避免阻塞异步运行时。
pub async fn create_archive(source_dir: &Path, archive_path: &Path, compression_level: u32) -> Result<u64> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs::File;
    use tar::Builder;

    if !source_dir.is_dir() {
        return Err(DockbackError::archive(format!(
            "源目录不存在: {}",
            source_dir.display()
        )));
    }

    if let Some(parent) = archive_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let source_dir = source_dir.to_path_buf();
    let archive_path = archive_path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = File::create(&archive_path)?;
        let encoder = GzEncoder::new(file, Compression::new(compression_level));
        let mut archive = Builder::new(encoder);
        archive.follow_symlinks(false);

        let mut entries = 0u64;
        for entry in WalkDir::new(&source_dir).min_depth(1) {
            let entry = entry?;
            let relative = entry.path().strip_prefix(&source_dir).map_err(|e| {
                DockbackError::archive(format!("计算相对路径失败: {e}"))
            })?;

            // tar 归档内部统一使用 Unix 风格路径
            let archive_name = relative.to_string_lossy().replace('\\', "/");
            let file_type = entry.file_type();

            if file_type.is_dir() {
                archive
                    .append_dir(&archive_name, entry.path())
                    .map_err(|e| DockbackError::archive(format!("添加目录到归档失败: {e}")))?;
            } else {
                archive
                    .append_path_with_name(entry.path(), &archive_name)
                    .map_err(|e| DockbackError::archive(format!("添加文件到归档失败: {e}")))?;
            }
            entries += 1;
        }

        let encoder = archive
            .into_inner()
            .map_err(|e| DockbackError::archive(format!("完成归档失败: {e}")))?;
        encoder
            .finish()
            .map_err(|e| DockbackError::archive(format!("完成压缩失败: {e}")))?;

        Ok::<u64, DockbackError>(entries)
    })
    .await?
}

/// 将 tar.gz 归档解压到目标目录
pub async fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<()> {
    use flate2::read::GzDecoder;
    use std::fs::File;
    use tar::Archive;

    if !archive_path.is_file() {
        return Err(DockbackError::archive(format!(
            "归档文件不存在: {}",
            archive_path.display()
        )));
    }

    tokio::fs::create_dir_all(target_dir).await?;

    let archive_path = archive_path.to_path_buf();
    let target_dir = target_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = File::open(&archive_path)?;
        let mut archive = Archive::new(GzDecoder::new(file));
        archive.set_preserve_permissions(true);

        archive
            .unpack(&target_dir)
            .map_err(|e| DockbackError::archive(format!("解压归档失败: {e}")))?;

        Ok::<(), DockbackError>(())
    })
    .await?
}

/// 归档文件名：`<名称>.tar.gz`
pub fn archive_file_name(name: &str) -> String {
    format!("{name}.{}", crate::constants::backup::ARCHIVE_EXTENSION)
}

/// 从归档文件名取回名称，扩展名不符时返回 None
pub fn name_from_archive(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(crate::constants::backup::ARCHIVE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

/// 清空目录内容但保留目录本身（卷挂载点不能删除）
pub async fn empty_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push(entry.path());
    }

    for path in paths {
        let metadata = tokio::fs::symlink_metadata(&path).await?;
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
    }
    Ok(())
}
