use crate::container::ComposeAssociation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 发现阶段得到的容器快照，构造后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerRecord {
    pub name: String,
    pub is_running: bool,
    pub compose: Option<ComposeAssociation>,
    pub labels: HashMap<String, String>,
}

/// 停机方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuiesceMethod {
    Stop,
    Pause,
    /// 不做运行时操作，完全依赖 pre/post 命令
    Command,
}

impl QuiesceMethod {
    /// 精确匹配（区分大小写），无法识别时返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stop" => Some(Self::Stop),
            "pause" => Some(Self::Pause),
            "command" => Some(Self::Command),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Command => "command",
        }
    }
}

impl fmt::Display for QuiesceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个容器的停机策略，同一轮备份内停机与恢复使用同一实例
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuiescePolicy {
    pub method: QuiesceMethod,
    pub pre_command: Option<String>,
    pub post_command: Option<String>,
    pub timeout_secs: u64,
}

/// 持久化到状态文件的停机记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuiesceRecord {
    pub container_name: String,
    pub policy: QuiescePolicy,
    pub was_running: bool,
    #[serde(default)]
    pub compose: Option<ComposeAssociation>,
}

/// prepare 阶段结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareResult {
    pub prepared_count: usize,
    pub failed_containers: Vec<String>,
}

/// resume 阶段结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeResult {
    pub restored_count: usize,
    pub failed_containers: Vec<String>,
}

impl PrepareResult {
    pub fn is_clean(&self) -> bool {
        self.failed_containers.is_empty()
    }
}

impl ResumeResult {
    pub fn is_clean(&self) -> bool {
        self.failed_containers.is_empty()
    }
}
