use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// 容器所属的 compose 项目信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeAssociation {
    pub project: String,
    pub service: String,
    pub working_dir: Option<PathBuf>,
}

/// `docker inspect` 返回的容器信息
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDetails {
    pub name: String,
    pub running: bool,
    pub labels: HashMap<String, String>,
    pub compose: Option<ComposeAssociation>,
}

/// `docker volume inspect` 返回的卷信息
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDetails {
    pub name: String,
    pub created_at: Option<String>,
    pub mountpoint: Option<PathBuf>,
    pub labels: HashMap<String, String>,
}

/// 基于 docker CLI 的容器运行时
#[derive(Debug, Clone)]
pub struct DockerCli {
    pub(crate) docker_bin: String,
    /// 独立安装的 docker-compose，compose 插件不可用时使用
    pub(crate) compose_bin: String,
}
