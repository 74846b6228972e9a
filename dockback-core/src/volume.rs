use crate::constants::labels;
use crate::container::{ContainerRuntime, DockerCli, VolumeDetails};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 单个 Docker 卷的描述，作为 JSON 附带文件与卷归档一起上传
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDescriptor {
    pub volume_id: String,
    pub meaningful_name: String,
    pub project: Option<String>,
    pub service: Option<String>,
    pub attached_containers: Vec<String>,
    pub created_at: Option<String>,
    pub mountpoint: Option<PathBuf>,
    pub labels: HashMap<String, String>,
}

impl VolumeDescriptor {
    /// 由卷信息与挂载容器构造描述，并计算有意义名称
    pub fn new(
        details: VolumeDetails,
        attached_containers: Vec<String>,
        service: Option<String>,
    ) -> Self {
        let project = details
            .labels
            .get(labels::COMPOSE_PROJECT)
            .filter(|p| !p.is_empty())
            .cloned();

        let mut descriptor = Self {
            volume_id: details.name,
            meaningful_name: String::new(),
            project,
            service: service.filter(|s| !s.is_empty()),
            attached_containers,
            created_at: details.created_at,
            mountpoint: details.mountpoint,
            labels: details.labels,
        };
        descriptor.meaningful_name = meaningful_name(&descriptor);
        descriptor
    }

    /// compose 中声明的卷名（`com.docker.compose.volume`）
    pub fn volume_label(&self) -> Option<&str> {
        self.labels
            .get(labels::COMPOSE_VOLUME)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// 名称或卷 ID 是否在排除列表中
    pub fn is_excluded(&self, excludes: &[String]) -> bool {
        excludes
            .iter()
            .any(|e| *e == self.meaningful_name || *e == self.volume_id)
    }
}

/// 为卷生成稳定的可读名称，按以下优先级取第一个可用规则：
///
/// 1. `项目_compose卷名`
/// 2. `项目_服务`
/// 3. `项目_volume`
/// 4. `第一个挂载容器_volume`
/// 5. `vol_卷ID前12位`
pub fn meaningful_name(volume: &VolumeDescriptor) -> String {
    let project = volume.project.as_deref().filter(|p| !p.is_empty());
    let service = volume.service.as_deref().filter(|s| !s.is_empty());

    match (project, volume.volume_label(), service) {
        (Some(project), Some(label), _) => format!("{project}_{label}"),
        (Some(project), None, Some(service)) => format!("{project}_{service}"),
        (Some(project), None, None) => format!("{project}_volume"),
        (None, _, _) => match volume.attached_containers.first() {
            Some(container) => format!("{container}_volume"),
            None => {
                let short: String = volume.volume_id.chars().take(12).collect();
                format!("vol_{short}")
            }
        },
    }
}

/// 发现本机所有卷并生成描述
///
/// 单个卷检查失败只记录警告；服务名取自第一个挂载容器的 compose 标签。
pub async fn discover_volumes(docker: &DockerCli) -> Result<Vec<VolumeDescriptor>> {
    let names = docker.list_volumes().await?;
    let mut volumes = Vec::with_capacity(names.len());

    for name in names {
        let details = match docker.inspect_volume(&name).await {
            Ok(details) => details,
            Err(e) => {
                warn!("检查卷 {} 失败，跳过: {}", name, e);
                continue;
            }
        };

        let attached = docker.containers_using_volume(&name).await.unwrap_or_else(|e| {
            warn!("查询卷 {} 的挂载容器失败: {}", name, e);
            Vec::new()
        });

        let service = match attached.first() {
            Some(container) => docker
                .inspect(container)
                .await
                .ok()
                .and_then(|c| c.labels.get(labels::COMPOSE_SERVICE).cloned()),
            None => None,
        };

        let descriptor = VolumeDescriptor::new(details, attached, service);
        debug!("卷 {} -> {}", descriptor.volume_id, descriptor.meaningful_name);
        volumes.push(descriptor);
    }

    disambiguate_names(&mut volumes);
    Ok(volumes)
}

/// 有意义名称冲突时追加卷 ID 前缀，保证同一批次内名称唯一
fn disambiguate_names(volumes: &mut [VolumeDescriptor]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for volume in volumes.iter() {
        *counts.entry(volume.meaningful_name.clone()).or_default() += 1;
    }

    for volume in volumes.iter_mut() {
        if counts.get(&volume.meaningful_name).copied().unwrap_or(0) > 1 {
            let short: String = volume.volume_id.chars().take(12).collect();
            warn!(
                "卷名称 {} 冲突，为卷 {} 追加 ID 前缀",
                volume.meaningful_name, volume.volume_id
            );
            volume.meaningful_name = format!("{}_{short}", volume.meaningful_name);
        }
    }
}
