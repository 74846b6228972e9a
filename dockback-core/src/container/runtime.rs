use super::types::{ComposeAssociation, ContainerDetails, DockerCli};
use crate::constants::labels;
use crate::{DockbackError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// 容器运行时的最小操作集合
///
/// 所有调用都是阻塞语义：返回时操作已经完成或失败。
/// `stop` 的超时由运行时自身保证。
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// 列出带指定标签过滤条件（`key=value`）的运行中容器名称
    async fn list_running(&self, label_filter: &str) -> Result<Vec<String>>;

    async fn inspect(&self, name: &str) -> Result<ContainerDetails>;

    async fn stop(&self, name: &str, timeout_secs: u64) -> Result<()>;

    async fn start(&self, name: &str) -> Result<()>;

    async fn pause(&self, name: &str) -> Result<()>;

    async fn unpause(&self, name: &str) -> Result<()>;

    /// 在容器内通过 `sh -c` 执行命令
    async fn exec(&self, name: &str, command: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectEntry {
    name: String,
    state: InspectState,
    config: InspectConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    running: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    #[serde(default)]
    labels: Option<HashMap<String, String>>,
}

/// 解析 `docker inspect <name>` 的 JSON 输出
pub(crate) fn parse_container_inspect(json_output: &str) -> Result<ContainerDetails> {
    let entries: Vec<InspectEntry> = serde_json::from_str(json_output)?;
    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| DockbackError::docker("docker inspect 未返回任何容器"))?;

    let labels = entry.config.labels.unwrap_or_default();
    let compose = compose_association(&labels);

    Ok(ContainerDetails {
        name: entry.name.trim_start_matches('/').to_string(),
        running: entry.state.running,
        labels,
        compose,
    })
}

/// 从 compose 标准标签中提取项目信息，项目和服务缺一不可
pub(crate) fn compose_association(labels: &HashMap<String, String>) -> Option<ComposeAssociation> {
    let project = labels.get(labels::COMPOSE_PROJECT).filter(|v| !v.is_empty())?;
    let service = labels.get(labels::COMPOSE_SERVICE).filter(|v| !v.is_empty())?;
    let working_dir = labels
        .get(labels::COMPOSE_WORKING_DIR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    Some(ComposeAssociation {
        project: project.clone(),
        service: service.clone(),
        working_dir,
    })
}

/// 把按行输出的名称列表拆分为 Vec
pub(crate) fn parse_name_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl DockerCli {
    async fn container_action(&self, args: &[&str]) -> Result<()> {
        debug!("执行: docker {}", args.join(" "));
        self.docker_stdout(args).await.map(|_| ())
    }
}

impl ContainerRuntime for DockerCli {
    async fn list_running(&self, label_filter: &str) -> Result<Vec<String>> {
        let filter = format!("label={label_filter}");
        let stdout = self
            .docker_stdout(&["ps", "--filter", &filter, "--format", "{{.Names}}"])
            .await?;
        Ok(parse_name_lines(&stdout))
    }

    async fn inspect(&self, name: &str) -> Result<ContainerDetails> {
        let stdout = self
            .docker_stdout(&["container", "inspect", name])
            .await?;
        parse_container_inspect(&stdout)
    }

    async fn stop(&self, name: &str, timeout_secs: u64) -> Result<()> {
        let timeout = timeout_secs.to_string();
        self.container_action(&["stop", "-t", &timeout, name]).await
    }

    async fn start(&self, name: &str) -> Result<()> {
        self.container_action(&["start", name]).await
    }

    async fn pause(&self, name: &str) -> Result<()> {
        self.container_action(&["pause", name]).await
    }

    async fn unpause(&self, name: &str) -> Result<()> {
        self.container_action(&["unpause", name]).await
    }

    async fn exec(&self, name: &str, command: &str) -> Result<()> {
        self.container_action(&["exec", name, "sh", "-c", command])
            .await
    }
}
