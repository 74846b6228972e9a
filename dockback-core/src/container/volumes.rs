use super::runtime::parse_name_lines;
use super::types::{DockerCli, VolumeDetails};
use crate::{DockbackError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VolumeInspectEntry {
    name: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    mountpoint: Option<String>,
    #[serde(default)]
    labels: Option<HashMap<String, String>>,
}

/// 解析 `docker volume inspect <name>` 的 JSON 输出
pub(crate) fn parse_volume_inspect(json_output: &str) -> Result<VolumeDetails> {
    let entries: Vec<VolumeInspectEntry> = serde_json::from_str(json_output)?;
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| DockbackError::docker("docker volume inspect 未返回任何卷"))?;

    Ok(VolumeDetails {
        name: entry.name,
        created_at: entry.created_at.filter(|s| !s.is_empty()),
        mountpoint: entry.mountpoint.filter(|s| !s.is_empty()).map(PathBuf::from),
        labels: entry.labels.unwrap_or_default(),
    })
}

impl DockerCli {
    /// 列出所有卷名称
    pub async fn list_volumes(&self) -> Result<Vec<String>> {
        let stdout = self.docker_stdout(&["volume", "ls", "-q"]).await?;
        Ok(parse_name_lines(&stdout))
    }

    pub async fn inspect_volume(&self, name: &str) -> Result<VolumeDetails> {
        let stdout = self.docker_stdout(&["volume", "inspect", name]).await?;
        parse_volume_inspect(&stdout)
    }

    /// 列出挂载了该卷的容器（包括已停止的容器）
    pub async fn containers_using_volume(&self, name: &str) -> Result<Vec<String>> {
        let filter = format!("volume={name}");
        let stdout = self
            .docker_stdout(&["ps", "-a", "--filter", &filter, "--format", "{{.Names}}"])
            .await?;
        Ok(parse_name_lines(&stdout))
    }
}
