use thiserror::Error;

pub type Result<T> = std::result::Result<T, DockbackError>;

#[derive(Error, Debug)]
pub enum DockbackError {
    #[error("配置错误: {0}")]
    Config(#[from] toml::de::Error),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("配置文件未找到")]
    ConfigNotFound,

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("任务执行错误: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("目录遍历错误: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Docker 命令执行失败: {0}")]
    Docker(String),

    #[error("Docker Compose 命令执行失败: {0}")]
    Compose(String),

    #[error("状态文件错误: {0}")]
    State(String),

    #[error("远程存储操作失败: {0}")]
    Storage(String),

    #[error("归档操作失败: {0}")]
    Archive(String),

    #[error("备份操作失败: {0}")]
    Backup(String),
}

impl DockbackError {
    pub fn docker(msg: impl Into<String>) -> Self {
        Self::Docker(msg.into())
    }

    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    pub fn backup(msg: impl Into<String>) -> Self {
        Self::Backup(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
